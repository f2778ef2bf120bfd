use super::*;
use crate::document::parse::parse;

fn doc() -> AnimationDocument {
    parse(
        br#"{"fr":30,"ip":0,"op":60,"w":64,"h":64,
        "assets":[{"id":"a","layers":[{"ks":{"r":{"a":1,"k":[{"t":0,"s":[0]},{"t":9,"s":[90]}]}}}]}],
        "layers":[
            {"ks":{"o":{"a":0,"k":100}},"nm":"first","shapes":[{"ty":"el","s":{"a":0,"k":[10.25,10.75]}}]},
            {"ks":{"p":{"a":1,"k":[{"t":0,"s":[1.5,2.5]},{"t":30,"s":[3,4]}]}}}
        ]}"#,
    )
    .unwrap()
}

#[test]
fn for_each_property_reports_paths_in_document_order() {
    let mut paths = Vec::new();
    for_each_property(&doc(), &mut |path, _| paths.push(path.to_string()));
    assert_eq!(
        paths,
        vec![
            "assets[0].layers[0].ks.r",
            "layers[0].ks.o",
            "layers[0].shapes[0].s",
            "layers[1].ks.p",
        ]
    );
}

#[derive(Default)]
struct Counter {
    layers: usize,
    assets: usize,
    keyframes: usize,
    floats: usize,
    keys: Vec<String>,
}

impl VisitMut for Counter {
    fn visit_layer_mut(&mut self, layer: &mut Layer) {
        self.layers += 1;
        walk_layer_mut(self, layer);
    }

    fn visit_asset_mut(&mut self, asset: &mut Asset) {
        self.assets += 1;
        walk_asset_mut(self, asset);
    }

    fn visit_keyframe_mut(&mut self, key: &mut Keyframe) {
        self.keyframes += 1;
        walk_keyframe_mut(self, key);
    }

    fn visit_float_mut(&mut self, _v: &mut f64) {
        self.floats += 1;
    }

    fn visit_number_mut(&mut self, key: Option<&str>, _n: &mut serde_json::Number) {
        if let Some(k) = key {
            self.keys.push(k.to_string());
        }
    }
}

#[test]
fn default_walk_reaches_every_node() {
    let mut d = doc();
    let mut c = Counter::default();
    c.visit_document_mut(&mut d);
    // Asset layers are opaque nodes, not `Layer`s.
    assert_eq!(c.layers, 2);
    assert_eq!(c.assets, 1);
    assert_eq!(c.keyframes, 4);
    // 0, 90, 100, 10.25, 10.75, 1.5, 2.5, 3, 4
    assert_eq!(c.floats, 9);
    for k in ["fr", "ip", "op", "w", "h"] {
        assert!(!c.keys.iter().any(|seen| seen == k), "typed root field {k} visited");
    }
}

#[test]
fn overriding_a_hook_can_stop_recursion() {
    struct SkipAssets(usize);
    impl VisitMut for SkipAssets {
        fn visit_asset_mut(&mut self, _asset: &mut Asset) {}
        fn visit_keyframe_mut(&mut self, _key: &mut Keyframe) {
            self.0 += 1;
        }
    }
    let mut d = doc();
    let mut v = SkipAssets(0);
    v.visit_document_mut(&mut d);
    assert_eq!(v.0, 2);
}

#[test]
fn mutation_through_the_visitor_is_kept() {
    struct Double;
    impl VisitMut for Double {
        fn visit_float_mut(&mut self, v: &mut f64) {
            *v *= 2.0;
        }
    }
    let mut d = doc();
    Double.visit_document_mut(&mut d);
    let p = d.layers[1]
        .transform
        .as_ref()
        .unwrap()
        .get(crate::TransformProperty::Position)
        .unwrap();
    assert_eq!(
        p.keyframes()[1].value,
        Some(KeyValue::Vector(vec![6.0, 8.0]))
    );
}

fn nested() -> AnimationDocument {
    parse(
        br#"{"fr":30,"ip":0,"op":60,"w":64,"h":64,"layers":[
            {"ks":{"o":{"a":1,"k":[
                {"t":0,"s":{"inner":{"a":1,"k":[{"t":0,"s":[1]},{"t":5,"s":[2]}]}}},
                {"t":30,"s":[100]}
            ]}}}
        ]}"#,
    )
    .unwrap()
}

#[test]
fn properties_inside_keyframe_values_are_reported() {
    let mut paths = Vec::new();
    for_each_property(&nested(), &mut |path, _| paths.push(path.to_string()));
    assert_eq!(paths, vec!["layers[0].ks.o", "layers[0].ks.o.k[0].s.inner"]);
    assert_eq!(nested().keyframe_count(), 4);
}

#[test]
fn both_traversals_see_the_same_properties() {
    #[derive(Default)]
    struct Props(usize);
    impl VisitMut for Props {
        fn visit_property_mut(&mut self, prop: &mut AnimatableProperty) {
            self.0 += 1;
            walk_property_mut(self, prop);
        }
    }
    for mut d in [doc(), nested()] {
        let mut seen = 0;
        for_each_property(&d, &mut |_, _| seen += 1);
        let mut v = Props::default();
        v.visit_document_mut(&mut d);
        assert_eq!(v.0, seen);
    }
}
