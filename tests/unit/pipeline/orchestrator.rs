use super::*;
use crate::document::property::AnimatableProperty;
use crate::foundation::error::ParseError;
use crate::pipeline::strategy::StrategyTable;

/// Deterministic pseudo-random document large enough to exceed small budgets.
fn noisy_document(layers: usize, keys: usize) -> Vec<u8> {
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = || {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (seed >> 11) as f64 / (1u64 << 53) as f64
    };
    let mut out = Vec::new();
    for l in 0..layers {
        let kf = |next: &mut dyn FnMut() -> f64, dims: usize| -> serde_json::Value {
            let frames: Vec<serde_json::Value> = (0..keys)
                .map(|i| {
                    let s: Vec<f64> = (0..dims).map(|_| next() * 512.0).collect();
                    serde_json::json!({
                        "t": i * 2,
                        "s": s,
                        "i": {"x": [next()], "y": [next()]},
                        "o": {"x": [next()], "y": [next()]},
                        "n": [format!("{:.3}_{:.3}", next(), next())]
                    })
                })
                .collect();
            serde_json::json!({"a": 1, "ix": 2, "k": frames})
        };
        out.push(serde_json::json!({
            "ty": 4, "nm": format!("Layer {l} / generated"), "mn": "ADBE Vector Layer",
            "ind": l + 1, "ddd": 0, "ao": 0, "bm": 0, "sr": 1, "st": 0, "ip": 0, "op": 120,
            "ks": {
                "p": kf(&mut next, 3),
                "s": kf(&mut next, 3),
                "o": kf(&mut next, 1),
                "r": {"a": 0, "k": next() * 360.0, "ix": 10, "x": "loopOut('cycle')"}
            }
        }));
    }
    serde_json::json!({
        "v": "5.7.4", "nm": "generated", "fr": 60, "ip": 0, "op": 120, "w": 512, "h": 512,
        "ddd": 0, "tgs": 1, "meta": {"g": "generator"}, "layers": out
    })
    .to_string()
    .into_bytes()
}

fn sizes(input: &[u8]) -> Vec<usize> {
    let (_, report) = compress_animation(input, 1).unwrap();
    report.attempts.iter().map(|a| a.size_bytes).collect()
}

#[test]
fn first_strategy_wins_when_the_budget_is_generous() {
    let input = noisy_document(2, 10);
    let (bytes, report) = compress_animation(&input, usize::MAX / 2).unwrap();
    assert!(report.met_budget);
    assert_eq!(report.strategy, "identity");
    assert_eq!(report.strategy_index, 0);
    assert_eq!(report.attempts.len(), 1);
    assert_eq!(report.size_bytes, bytes.len());
    assert_eq!(report.keyframes_before, report.keyframes_after);
}

#[test]
fn strategy_sizes_are_monotonic() {
    let s = sizes(&noisy_document(8, 40));
    assert_eq!(s.len(), 4);
    assert!(s.windows(2).all(|w| w[0] >= w[1]), "{s:?}");
}

/// Three four-keyframe properties per layer at 0/45/90/120: the half cut at 60 falls a
/// third of the way between 45 and 90.
fn straddling_document(layers: usize) -> Vec<u8> {
    let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = move || {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (seed >> 11) as f64 / (1u64 << 53) as f64 * 512.0
    };
    let out: Vec<serde_json::Value> = (0..layers)
        .map(|l| {
            let mut prop = |dims: usize| {
                let k: Vec<serde_json::Value> = [0, 45, 90, 120]
                    .into_iter()
                    .map(|t| {
                        let s: Vec<f64> = (0..dims).map(|_| next()).collect();
                        serde_json::json!({"t": t, "s": s})
                    })
                    .collect();
                serde_json::json!({"a": 1, "k": k})
            };
            serde_json::json!({
                "ty": 4, "ind": l + 1, "ip": 0, "op": 120,
                "ks": {"p": prop(2), "s": prop(2), "o": prop(1)}
            })
        })
        .collect();
    serde_json::json!({"fr": 60, "ip": 0, "op": 120, "w": 512, "h": 512, "layers": out})
        .to_string()
        .into_bytes()
}

#[test]
fn sizes_stay_monotonic_when_the_cut_falls_between_keyframes() {
    let input = straddling_document(200);
    let s = sizes(&input);
    assert_eq!(s.len(), 4);
    assert!(s.windows(2).all(|w| w[0] >= w[1]), "{s:?}");

    let (bytes, report) = compress_animation(&input, 1).unwrap();
    assert_eq!(report.strategy, "aggressive");
    let doc = crate::document::parse::parse(&bytes).unwrap();
    assert_eq!(doc.out_point, 60.0);
    crate::document::visit::for_each_property(&doc, &mut |path, prop| {
        assert_eq!(prop.times(), vec![0.0, 60.0], "{path}");
        for key in prop.keyframes() {
            for &v in key.value.as_ref().and_then(|v| v.as_numbers()).unwrap_or(&[]) {
                assert_eq!((v * 100.0).round() / 100.0, v, "{path}: {v}");
            }
        }
    });
}

#[test]
fn least_destructive_fitting_strategy_is_chosen() {
    let input = noisy_document(8, 40);
    let s = sizes(&input);
    assert!(s[1] > s[2], "{s:?}");

    let (bytes, report) = compress_animation(&input, s[2]).unwrap();
    assert!(report.met_budget);
    assert_eq!(report.strategy_index, 2);
    assert_eq!(report.strategy, "decimate");
    assert_eq!(report.attempts.len(), 3);
    assert_eq!(bytes.len(), s[2]);
    assert!(report.keyframes_after < report.keyframes_before);
}

#[test]
fn unmet_budget_returns_the_last_strategy() {
    let input = noisy_document(4, 20);
    let (bytes, report) = compress_animation(&input, 1).unwrap();
    assert!(!report.met_budget);
    assert_eq!(report.strategy, "aggressive");
    assert_eq!(report.strategy_index, 3);
    assert_eq!(report.attempts.len(), 4);
    assert_eq!(report.size_bytes, bytes.len());
    assert!(crate::document::parse::parse(&bytes).is_ok());
}

#[test]
fn random_bytes_fail_with_malformed_syntax() {
    let err = compress_animation(&[7, 0xff, 0x10, 0x80, 3, 9, 0xaa, 0x55, 0x01, 0xfe], 65_536)
        .unwrap_err();
    assert!(
        matches!(err.as_parse(), Some(ParseError::MalformedSyntax(_))),
        "{err}"
    );
}

#[test]
fn missing_field_aborts_before_any_strategy() {
    let err = compress_animation(br#"{"fr":30,"ip":0,"w":1,"h":1,"layers":[]}"#, 10).unwrap_err();
    assert_eq!(
        err.as_parse(),
        Some(&ParseError::MissingRequiredField("op".to_string()))
    );
}

#[test]
fn state_machine_walks_the_table() {
    let doc = crate::document::parse::parse(&noisy_document(4, 20)).unwrap();
    let opts = CompressOpts::with_budget(1);
    let mut o = Orchestrator::new(doc, &opts).unwrap();
    assert_eq!(o.state(), AttemptState::Unattempted);
    let mut seen = vec![o.state()];
    while !o.state().is_terminal() {
        seen.push(o.step().unwrap());
    }
    assert_eq!(
        seen,
        vec![
            AttemptState::Unattempted,
            AttemptState::Trying(0),
            AttemptState::Trying(1),
            AttemptState::Trying(2),
            AttemptState::Trying(3),
            AttemptState::Exhausted,
        ]
    );
    assert_eq!(o.step().unwrap(), AttemptState::Exhausted);
    let (_, report) = o.run().unwrap();
    assert!(!report.met_budget);
}

#[test]
fn invariant_violations_are_not_swallowed() {
    let mut doc =
        crate::document::parse::parse(br#"{"fr":30,"ip":0,"op":60,"w":1,"h":1,"layers":[{}]}"#)
            .unwrap();
    doc.layers[0].extra.insert(
        "broken".to_string(),
        AnimatableProperty::keyframed(Vec::new()).into(),
    );
    let err = compress_document(doc, &CompressOpts::default()).unwrap_err();
    match err {
        TgsError::Invariant(v) => {
            assert_eq!(v.stage, "identity");
            assert_eq!(v.path, "layers[0].broken");
        }
        other => panic!("unexpected {other}"),
    }
}

#[test]
fn empty_strategy_table_is_a_config_error() {
    let opts = CompressOpts {
        strategies: serde_json::from_str::<StrategyTable>("[]").unwrap(),
        ..CompressOpts::default()
    };
    let err = compress_with(&noisy_document(1, 3), &opts).unwrap_err();
    assert!(matches!(err, TgsError::Config(_)), "{err}");
}

#[test]
fn lint_warnings_reflect_the_output() {
    let input = br#"{"fr":24,"ip":0,"op":240,"w":100,"h":100,"layers":[]}"#;
    let (_, report) = compress_animation(input, 65_536).unwrap();
    assert_eq!(report.warnings.len(), 4, "{:?}", report.warnings);

    let opts = CompressOpts {
        lint: false,
        ..CompressOpts::default()
    };
    let (_, report) = compress_with(input, &opts).unwrap();
    assert!(report.warnings.is_empty());
}

#[test]
fn output_is_deterministic() {
    let input = noisy_document(3, 12);
    let (a, ra) = compress_animation(&input, 2_000).unwrap();
    let (b, rb) = compress_animation(&input, 2_000).unwrap();
    assert_eq!(a, b);
    assert_eq!(ra, rb);
}
