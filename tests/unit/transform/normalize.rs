use super::*;
use crate::document::parse::parse;
use crate::document::serialize::serialize;

const SAMPLE: &[u8] = br#"{"fr":29.97,"ip":0,"op":90.5,"w":512,"h":512,
    "assets":[{"id":"img_0","w":100,"h":100,"u":"","p":"data:","e":1,"k":0.123456}],
    "layers":[{"ind":1,"st":0.5,"ip":0,"op":90,"ks":{
        "o":{"a":0,"k":99.99999},
        "p":{"a":1,"k":[
            {"t":0.25,"s":[256.123456,255.987654],"i":{"x":[0.8333333],"y":[0.8333333]}},
            {"t":45.5,"s":[10.5,-3.14159]}
        ]}
    },"shapes":[{"ty":"rc","r":{"a":0,"k":4.44444},"count":3}]}]}"#;

fn p(digits: u8) -> Precision {
    Precision::new(digits).unwrap()
}

fn json(doc: &AnimationDocument) -> serde_json::Value {
    serde_json::from_slice(&serialize(doc).unwrap()).unwrap()
}

#[test]
fn rounds_floats_to_precision() {
    let out = json(&normalize(parse(SAMPLE).unwrap(), p(2)));
    let ks = &out["layers"][0]["ks"];
    assert_eq!(ks["o"]["k"], serde_json::json!(100));
    assert_eq!(ks["p"]["k"][0]["s"], serde_json::json!([256.12, 255.99]));
    assert_eq!(ks["p"]["k"][0]["i"]["x"], serde_json::json!([0.83]));
    assert_eq!(ks["p"]["k"][1]["s"], serde_json::json!([10.5, -3.14]));
    assert_eq!(out["layers"][0]["shapes"][0]["r"]["k"], serde_json::json!(4.44));
    assert_eq!(out["assets"][0]["k"], serde_json::json!(0.12));
}

#[test]
fn frame_indices_and_identifiers_are_exact() {
    let doc = normalize(parse(SAMPLE).unwrap(), p(0));
    assert_eq!(doc.frame_rate, 29.97);
    assert_eq!(doc.out_point, 90.5);
    assert_eq!(doc.layers[0].start_time, Some(0.5));
    let out = json(&doc);
    let keys = &out["layers"][0]["ks"]["p"]["k"];
    assert_eq!(keys[0]["t"], serde_json::json!(0.25));
    assert_eq!(keys[1]["t"], serde_json::json!(45.5));
    assert_eq!(out["layers"][0]["shapes"][0]["count"], serde_json::json!(3));
}

#[test]
fn normalization_is_idempotent() {
    for digits in 0..=Precision::MAX_DIGITS {
        let once = normalize(parse(SAMPLE).unwrap(), p(digits));
        let twice = normalize(once.clone(), p(digits));
        assert_eq!(once, twice, "precision {digits}");
    }
}

#[test]
fn structure_is_isomorphic() {
    fn shape(v: &serde_json::Value) -> serde_json::Value {
        match v {
            serde_json::Value::Object(m) => {
                serde_json::Value::Object(m.iter().map(|(k, v)| (k.clone(), shape(v))).collect())
            }
            serde_json::Value::Array(a) => serde_json::Value::Array(a.iter().map(shape).collect()),
            _ => serde_json::Value::Null,
        }
    }
    let before = json(&parse(SAMPLE).unwrap());
    let after = json(&normalize(parse(SAMPLE).unwrap(), p(1)));
    assert_eq!(shape(&before), shape(&after));
}

#[test]
fn serialized_size_never_grows() {
    let before = serialize(&parse(SAMPLE).unwrap()).unwrap().len();
    let mut last = before;
    for digits in (0..=Precision::MAX_DIGITS).rev() {
        let n = serialize(&normalize(parse(SAMPLE).unwrap(), p(digits)))
            .unwrap()
            .len();
        assert!(n <= before, "precision {digits}: {n} > {before}");
        assert!(n <= last, "precision {digits}: {n} > {last}");
        last = n;
    }
}
