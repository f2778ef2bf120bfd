//! Mutable traversal over the typed document tree.
//!
//! Transformations implement [`VisitMut`] and override only the hooks they care about; the
//! `walk_*` functions provide the default recursion and can be called from an override to
//! continue into children.

use crate::document::model::{AnimationDocument, Asset, Fields, Layer, Node};
use crate::document::property::{AnimatableProperty, KeyValue, Keyframe, PropertyValue};

/// Mutable visitor over an [`AnimationDocument`].
pub trait VisitMut {
    /// Visit the document root.
    fn visit_document_mut(&mut self, doc: &mut AnimationDocument) {
        walk_document_mut(self, doc);
    }

    /// Visit one layer.
    fn visit_layer_mut(&mut self, layer: &mut Layer) {
        walk_layer_mut(self, layer);
    }

    /// Visit one asset.
    fn visit_asset_mut(&mut self, asset: &mut Asset) {
        walk_asset_mut(self, asset);
    }

    /// Visit an opaque key/value block.
    fn visit_fields_mut(&mut self, fields: &mut Fields) {
        walk_fields_mut(self, fields);
    }

    /// Visit a node; `key` is the name it is stored under (inherited by array items).
    fn visit_node_mut(&mut self, key: Option<&str>, node: &mut Node) {
        walk_node_mut(self, key, node);
    }

    /// Visit an animatable property.
    fn visit_property_mut(&mut self, prop: &mut AnimatableProperty) {
        walk_property_mut(self, prop);
    }

    /// Visit a keyframe.
    fn visit_keyframe_mut(&mut self, key: &mut Keyframe) {
        walk_keyframe_mut(self, key);
    }

    /// Visit a keyframe or static value.
    fn visit_key_value_mut(&mut self, value: &mut KeyValue) {
        walk_key_value_mut(self, value);
    }

    /// Visit a numeric leaf of an opaque node.
    fn visit_number_mut(&mut self, _key: Option<&str>, _n: &mut serde_json::Number) {}

    /// Visit a numeric component of a [`KeyValue`].
    fn visit_float_mut(&mut self, _v: &mut f64) {}
}

/// Default recursion for [`VisitMut::visit_document_mut`].
pub fn walk_document_mut<V: VisitMut + ?Sized>(v: &mut V, doc: &mut AnimationDocument) {
    v.visit_fields_mut(&mut doc.extra);
    for asset in &mut doc.assets {
        v.visit_asset_mut(asset);
    }
    for layer in &mut doc.layers {
        v.visit_layer_mut(layer);
    }
}

/// Default recursion for [`VisitMut::visit_layer_mut`].
pub fn walk_layer_mut<V: VisitMut + ?Sized>(v: &mut V, layer: &mut Layer) {
    if let Some(ks) = &mut layer.transform {
        v.visit_fields_mut(&mut ks.entries);
    }
    v.visit_fields_mut(&mut layer.extra);
}

/// Default recursion for [`VisitMut::visit_asset_mut`].
pub fn walk_asset_mut<V: VisitMut + ?Sized>(v: &mut V, asset: &mut Asset) {
    v.visit_fields_mut(&mut asset.extra);
}

/// Default recursion for [`VisitMut::visit_fields_mut`].
pub fn walk_fields_mut<V: VisitMut + ?Sized>(v: &mut V, fields: &mut Fields) {
    for (key, node) in fields.iter_mut() {
        v.visit_node_mut(Some(key.as_str()), node);
    }
}

/// Default recursion for [`VisitMut::visit_node_mut`].
pub fn walk_node_mut<V: VisitMut + ?Sized>(v: &mut V, key: Option<&str>, node: &mut Node) {
    match node {
        Node::Leaf(serde_json::Value::Number(n)) => v.visit_number_mut(key, n),
        Node::Leaf(_) => {}
        Node::Array(items) => {
            for item in items {
                v.visit_node_mut(key, item);
            }
        }
        Node::Object(fields) => v.visit_fields_mut(fields),
        Node::Property(prop) => v.visit_property_mut(prop),
    }
}

/// Default recursion for [`VisitMut::visit_property_mut`].
pub fn walk_property_mut<V: VisitMut + ?Sized>(v: &mut V, prop: &mut AnimatableProperty) {
    match &mut prop.value {
        PropertyValue::Static(value) => v.visit_key_value_mut(value),
        PropertyValue::Keyframed(keys) => {
            for key in keys {
                v.visit_keyframe_mut(key);
            }
        }
    }
    v.visit_fields_mut(&mut prop.extra);
}

/// Default recursion for [`VisitMut::visit_keyframe_mut`].
pub fn walk_keyframe_mut<V: VisitMut + ?Sized>(v: &mut V, key: &mut Keyframe) {
    if let Some(value) = &mut key.value {
        v.visit_key_value_mut(value);
    }
    if let Some(end) = &mut key.end {
        v.visit_key_value_mut(end);
    }
    v.visit_fields_mut(&mut key.extra);
}

/// Default recursion for [`VisitMut::visit_key_value_mut`].
pub fn walk_key_value_mut<V: VisitMut + ?Sized>(v: &mut V, value: &mut KeyValue) {
    match value {
        KeyValue::Scalar(x) => v.visit_float_mut(x),
        KeyValue::Vector(xs) => {
            for x in xs {
                v.visit_float_mut(x);
            }
        }
        KeyValue::Shape(node) => v.visit_node_mut(None, node),
    }
}

/// Call `f` with the JSON path and value of every animatable property in the document.
///
/// Reaches the same nodes as the [`VisitMut`] walkers, including properties nested inside
/// keyframe values.
pub fn for_each_property(
    doc: &AnimationDocument,
    f: &mut dyn FnMut(&str, &AnimatableProperty),
) {
    let mut path = String::new();
    for (i, asset) in doc.assets.iter().enumerate() {
        with_segment(&mut path, &format!("assets[{i}]"), |path| {
            fields_properties(&asset.extra, path, f)
        });
    }
    for (i, layer) in doc.layers.iter().enumerate() {
        with_segment(&mut path, &format!("layers[{i}]"), |path| {
            if let Some(ks) = &layer.transform {
                with_segment(path, ".ks", |path| fields_properties(&ks.entries, path, f));
            }
            fields_properties(&layer.extra, path, f);
        });
    }
}

fn fields_properties(
    fields: &Fields,
    path: &mut String,
    f: &mut dyn FnMut(&str, &AnimatableProperty),
) {
    for (key, node) in fields {
        with_segment(path, &format!(".{key}"), |path| node_properties(node, path, f));
    }
}

fn node_properties(node: &Node, path: &mut String, f: &mut dyn FnMut(&str, &AnimatableProperty)) {
    match node {
        Node::Leaf(_) => {}
        Node::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                with_segment(path, &format!("[{i}]"), |path| node_properties(item, path, f));
            }
        }
        Node::Object(fields) => fields_properties(fields, path, f),
        Node::Property(prop) => {
            f(path, prop);
            match &prop.value {
                PropertyValue::Static(value) => {
                    with_segment(path, ".k", |path| value_properties(value, path, f));
                }
                PropertyValue::Keyframed(keys) => {
                    for (i, key) in keys.iter().enumerate() {
                        with_segment(path, &format!(".k[{i}]"), |path| {
                            keyframe_properties(key, path, f)
                        });
                    }
                }
            }
            fields_properties(&prop.extra, path, f);
        }
    }
}

fn keyframe_properties(
    key: &Keyframe,
    path: &mut String,
    f: &mut dyn FnMut(&str, &AnimatableProperty),
) {
    if let Some(value) = &key.value {
        with_segment(path, ".s", |path| value_properties(value, path, f));
    }
    if let Some(end) = &key.end {
        with_segment(path, ".e", |path| value_properties(end, path, f));
    }
    fields_properties(&key.extra, path, f);
}

fn value_properties(
    value: &KeyValue,
    path: &mut String,
    f: &mut dyn FnMut(&str, &AnimatableProperty),
) {
    if let KeyValue::Shape(node) = value {
        node_properties(node, path, f);
    }
}

fn with_segment(path: &mut String, segment: &str, body: impl FnOnce(&mut String)) {
    let len = path.len();
    path.push_str(segment);
    body(path);
    path.truncate(len);
}

#[cfg(test)]
#[path = "../../tests/unit/document/visit.rs"]
mod tests;
