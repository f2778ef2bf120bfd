use serde::de::IgnoredAny;
use serde_json::{Map, Value};

use crate::document::model::{AnimationDocument, Asset, Fields, Layer, Node, Transform};
use crate::document::property::{AnimatableProperty, KeyValue, Keyframe, PropertyValue};
use crate::encode::gzip::{inflate, is_gzip};
use crate::foundation::error::ParseError;

/// Parse raw JSON or a gzip-compressed `.tgs` artifact into a document.
///
/// Field order is irrelevant and unknown keys are kept as opaque nodes. Only the root
/// fields the model needs (`fr`, `ip`, `op`, `w`, `h`, `layers`) are required.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn parse(bytes: &[u8]) -> Result<AnimationDocument, ParseError> {
    let inflated;
    let json = if is_gzip(bytes) {
        inflated = inflate(bytes)
            .map_err(|e| ParseError::malformed(format!("corrupt gzip stream: {e}")))?;
        inflated.as_slice()
    } else {
        bytes
    };

    let value: Value =
        serde_json::from_slice(json).map_err(|e| ParseError::malformed(e.to_string()))?;
    let Value::Object(root) = value else {
        return Err(ParseError::malformed("top-level JSON value is not an object"));
    };

    let doc = document_from_map(root)?;
    tracing::debug!(
        layers = doc.layers.len(),
        assets = doc.assets.len(),
        "parsed animation document"
    );
    Ok(doc)
}

/// Cheap pre-flight check: does the input look like an animation document?
///
/// Only the presence of the required root fields is checked; their contents are skipped.
pub fn validate(bytes: &[u8]) -> bool {
    #[derive(serde::Deserialize)]
    #[allow(dead_code)]
    struct Probe {
        fr: IgnoredAny,
        ip: IgnoredAny,
        op: IgnoredAny,
        w: IgnoredAny,
        h: IgnoredAny,
        layers: IgnoredAny,
    }

    if is_gzip(bytes) {
        return match inflate(bytes) {
            Ok(json) => serde_json::from_slice::<Probe>(&json).is_ok(),
            Err(_) => false,
        };
    }
    serde_json::from_slice::<Probe>(bytes).is_ok()
}

fn document_from_map(mut root: Map<String, Value>) -> Result<AnimationDocument, ParseError> {
    let frame_rate = take_required_number(&mut root, "fr")?;
    if !(frame_rate > 0.0) {
        return Err(ParseError::invalid("fr", "frame rate must be positive"));
    }
    let in_point = take_required_number(&mut root, "ip")?;
    let out_point = take_required_number(&mut root, "op")?;
    if !(out_point - in_point > 0.0) {
        return Err(ParseError::invalid(
            "op",
            format!("out-point {out_point} must be after in-point {in_point}"),
        ));
    }
    let width = take_dimension(&mut root, "w")?;
    let height = take_dimension(&mut root, "h")?;

    let layers = match root.remove("layers") {
        None => return Err(ParseError::missing("layers")),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| layer_from_value(v, &format!("layers[{i}]")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(ParseError::invalid(
                "layers",
                format!("expected an array, got {}", kind(&other)),
            ));
        }
    };

    let assets = match root.remove("assets") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| asset_from_value(v, &format!("assets[{i}]")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(ParseError::invalid(
                "assets",
                format!("expected an array, got {}", kind(&other)),
            ));
        }
    };

    Ok(AnimationDocument {
        frame_rate,
        in_point,
        out_point,
        width,
        height,
        layers,
        assets,
        extra: fields_from_map(root),
    })
}

fn layer_from_value(value: Value, path: &str) -> Result<Layer, ParseError> {
    let Value::Object(mut map) = value else {
        return Err(ParseError::invalid(
            path,
            format!("expected a layer object, got {}", kind(&value)),
        ));
    };

    let transform = match map.remove("ks") {
        None => None,
        Some(Value::Object(ks)) => Some(Transform {
            entries: fields_from_map(ks),
        }),
        Some(other) => {
            return Err(ParseError::invalid(
                format!("{path}.ks"),
                format!("expected an object, got {}", kind(&other)),
            ));
        }
    };

    // Non-string references and ids stay in the opaque part.
    let asset_ref = match map.remove("refId") {
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            map.insert("refId".to_string(), other);
            None
        }
        None => None,
    };

    Ok(Layer {
        transform,
        in_point: take_number(&mut map, "ip", path)?,
        out_point: take_number(&mut map, "op", path)?,
        start_time: take_number(&mut map, "st", path)?,
        stretch: take_number(&mut map, "sr", path)?,
        asset_ref,
        extra: fields_from_map(map),
    })
}

fn asset_from_value(value: Value, path: &str) -> Result<Asset, ParseError> {
    let Value::Object(mut map) = value else {
        return Err(ParseError::invalid(
            path,
            format!("expected an asset object, got {}", kind(&value)),
        ));
    };
    let id = match map.remove("id") {
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            map.insert("id".to_string(), other);
            None
        }
        None => None,
    };
    Ok(Asset {
        id,
        extra: fields_from_map(map),
    })
}

pub(crate) fn fields_from_map(map: Map<String, Value>) -> Fields {
    map.into_iter()
        .map(|(k, v)| (k, node_from_value(v)))
        .collect()
}

pub(crate) fn node_from_value(value: Value) -> Node {
    match value {
        Value::Array(items) => Node::Array(items.into_iter().map(node_from_value).collect()),
        Value::Object(map) => match property_from_map(map) {
            Ok(prop) => Node::Property(Box::new(prop)),
            Err(map) => Node::Object(fields_from_map(map)),
        },
        leaf => Node::Leaf(leaf),
    }
}

/// Recognise `{"a": 0|1, "k": ...}`. Objects that only look similar are handed back.
fn property_from_map(
    mut map: Map<String, Value>,
) -> Result<AnimatableProperty, Map<String, Value>> {
    let animated = match map.get("a").and_then(Value::as_u64) {
        Some(0) => false,
        Some(1) => true,
        _ => return Err(map),
    };
    let Some(k) = map.remove("k") else {
        return Err(map);
    };

    let value = if animated {
        if !is_keyframe_list(&k) {
            map.insert("k".to_string(), k);
            return Err(map);
        }
        let Value::Array(items) = k else {
            return Err(map);
        };
        PropertyValue::Keyframed(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(m) => Some(keyframe_from_map(m)),
                    _ => None,
                })
                .collect(),
        )
    } else {
        PropertyValue::Static(key_value_from_value(k))
    };

    map.remove("a");
    Ok(AnimatableProperty {
        value,
        extra: fields_from_map(map),
    })
}

/// Non-empty array of objects with numeric, non-decreasing `t`.
///
/// Lists that fail this stay opaque so malformed real-world data is passed through.
fn is_keyframe_list(k: &Value) -> bool {
    let Value::Array(items) = k else {
        return false;
    };
    if items.is_empty() || !items.iter().all(Value::is_object) {
        return false;
    }
    let times: Option<Vec<f64>> = items
        .iter()
        .map(|item| item.get("t").and_then(Value::as_f64))
        .collect();
    match times {
        Some(times) => times.windows(2).all(|w| w[0] <= w[1]),
        None => false,
    }
}

fn keyframe_from_map(mut map: Map<String, Value>) -> Keyframe {
    let time = map.remove("t").and_then(|t| t.as_f64()).unwrap_or_default();
    let value = map.remove("s").map(key_value_from_value);
    let end = map.remove("e").map(key_value_from_value);
    Keyframe {
        time,
        value,
        end,
        extra: fields_from_map(map),
    }
}

pub(crate) fn key_value_from_value(value: Value) -> KeyValue {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(v) => KeyValue::Scalar(v),
            None => KeyValue::Shape(Node::Leaf(Value::Number(n))),
        },
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_number) => {
            KeyValue::Vector(items.iter().filter_map(Value::as_f64).collect())
        }
        other => KeyValue::Shape(node_from_value(other)),
    }
}

fn take_required_number(map: &mut Map<String, Value>, key: &str) -> Result<f64, ParseError> {
    take_number(map, key, "")?.ok_or_else(|| ParseError::missing(key))
}

fn take_number(
    map: &mut Map<String, Value>,
    key: &str,
    parent: &str,
) -> Result<Option<f64>, ParseError> {
    match map.remove(key) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(ParseError::invalid(
            join_path(parent, key),
            format!("expected a number, got {}", kind(&other)),
        )),
    }
}

fn take_dimension(map: &mut Map<String, Value>, key: &str) -> Result<u32, ParseError> {
    let v = take_required_number(map, key)?;
    if v.fract() != 0.0 || v < 1.0 || v > f64::from(u32::MAX) {
        return Err(ParseError::invalid(
            key,
            format!("canvas size must be a positive integer, got {v}"),
        ));
    }
    Ok(v as u32)
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/parse.rs"]
mod tests;
