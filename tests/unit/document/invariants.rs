use super::*;
use crate::document::model::TransformProperty;
use crate::document::parse::parse;
use crate::document::property::{AnimatableProperty, KeyValue, Keyframe};

fn doc() -> AnimationDocument {
    parse(
        br#"{"fr":30,"ip":0,"op":60,"w":64,"h":64,"layers":[
            {"ks":{"o":{"a":1,"k":[{"t":0,"s":[0]},{"t":30,"s":[100]}]}}}
        ]}"#,
    )
    .unwrap()
}

fn set_opacity(d: &mut AnimationDocument, keys: Vec<Keyframe>) {
    d.layers[0]
        .transform
        .as_mut()
        .unwrap()
        .set(TransformProperty::Opacity, AnimatableProperty::keyframed(keys));
}

#[test]
fn parsed_documents_hold_the_invariants() {
    assert!(check_invariants(&doc(), "parse").is_ok());
}

#[test]
fn empty_keyframe_list_is_reported_with_its_path() {
    let mut d = doc();
    set_opacity(&mut d, Vec::new());
    let err = check_invariants(&d, "truncate").unwrap_err();
    assert_eq!(err.stage, "truncate");
    assert_eq!(err.path, "layers[0].ks.o");
    assert!(err.message.contains("no keyframes"));
}

#[test]
fn unsorted_keyframes_are_reported() {
    let mut d = doc();
    set_opacity(
        &mut d,
        vec![
            Keyframe::new(10.0, KeyValue::Scalar(0.0)),
            Keyframe::new(5.0, KeyValue::Scalar(1.0)),
        ],
    );
    let err = check_invariants(&d, "decimate").unwrap_err();
    assert!(err.message.contains("not sorted"));
}

#[test]
fn empty_play_range_and_bad_frame_rate_are_reported() {
    let mut d = doc();
    d.out_point = d.in_point;
    assert_eq!(check_invariants(&d, "x").unwrap_err().path, "op");

    let mut d = doc();
    d.frame_rate = 0.0;
    assert_eq!(check_invariants(&d, "x").unwrap_err().path, "fr");
}

#[test]
fn properties_nested_in_keyframe_values_are_checked() {
    struct Unsort;
    impl crate::document::visit::VisitMut for Unsort {
        fn visit_property_mut(&mut self, prop: &mut AnimatableProperty) {
            crate::document::visit::walk_property_mut(self, prop);
            if let PropertyValue::Keyframed(keys) = &mut prop.value {
                if keys.len() == 2 && keys[1].time == 5.0 {
                    keys.reverse();
                }
            }
        }
    }
    let mut d = parse(
        br#"{"fr":30,"ip":0,"op":60,"w":64,"h":64,"layers":[
            {"ks":{"o":{"a":1,"k":[
                {"t":0,"s":{"inner":{"a":1,"k":[{"t":0,"s":[1]},{"t":5,"s":[2]}]}}},
                {"t":30,"s":[100]}
            ]}}}
        ]}"#,
    )
    .unwrap();
    check_invariants(&d, "parse").unwrap();
    crate::document::visit::VisitMut::visit_document_mut(&mut Unsort, &mut d);
    let err = check_invariants(&d, "unsort").unwrap_err();
    assert_eq!(err.path, "layers[0].ks.o.k[0].s.inner");
}
