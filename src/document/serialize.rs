use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::document::model::{AnimationDocument, Asset, Fields, Layer, Node};
use crate::document::property::{AnimatableProperty, KeyValue, Keyframe, PropertyValue};
use crate::foundation::core::Compact;
use crate::foundation::error::{TgsError, TgsResult};

/// Render a document as compact (whitespace-free) JSON.
///
/// Output is deterministic: typed root keys first, then opaque keys in sorted order.
pub fn serialize(doc: &AnimationDocument) -> TgsResult<Vec<u8>> {
    serde_json::to_vec(doc).map_err(|e| TgsError::Other(anyhow::Error::new(e)))
}

/// Same as [`serialize`] but indented, for humans.
pub fn serialize_pretty(doc: &AnimationDocument) -> TgsResult<Vec<u8>> {
    serde_json::to_vec_pretty(doc).map_err(|e| TgsError::Other(anyhow::Error::new(e)))
}

impl Serialize for AnimationDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.extra.len() + 7))?;
        map.serialize_entry("fr", &Compact(self.frame_rate))?;
        map.serialize_entry("ip", &Compact(self.in_point))?;
        map.serialize_entry("op", &Compact(self.out_point))?;
        map.serialize_entry("w", &self.width)?;
        map.serialize_entry("h", &self.height)?;
        write_fields(&mut map, &self.extra)?;
        map.serialize_entry("assets", &self.assets)?;
        map.serialize_entry("layers", &self.layers)?;
        map.end()
    }
}

impl Serialize for Layer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(ks) = &self.transform {
            map.serialize_entry("ks", &FieldsRef(&ks.entries))?;
        }
        write_opt_number(&mut map, "ip", self.in_point)?;
        write_opt_number(&mut map, "op", self.out_point)?;
        write_opt_number(&mut map, "st", self.start_time)?;
        write_opt_number(&mut map, "sr", self.stretch)?;
        if let Some(r) = &self.asset_ref {
            map.serialize_entry("refId", r)?;
        }
        write_fields(&mut map, &self.extra)?;
        map.end()
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        write_fields(&mut map, &self.extra)?;
        map.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(v) => v.serialize(serializer),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(fields) => FieldsRef(fields).serialize(serializer),
            Self::Property(p) => p.serialize(serializer),
        }
    }
}

impl Serialize for AnimatableProperty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.value {
            PropertyValue::Static(v) => {
                map.serialize_entry("a", &0)?;
                map.serialize_entry("k", v)?;
            }
            PropertyValue::Keyframed(keys) => {
                map.serialize_entry("a", &1)?;
                map.serialize_entry("k", keys)?;
            }
        }
        write_fields(&mut map, &self.extra)?;
        map.end()
    }
}

impl Serialize for Keyframe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("t", &Compact(self.time))?;
        if let Some(s) = &self.value {
            map.serialize_entry("s", s)?;
        }
        if let Some(e) = &self.end {
            map.serialize_entry("e", e)?;
        }
        write_fields(&mut map, &self.extra)?;
        map.end()
    }
}

impl Serialize for KeyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(v) => Compact(*v).serialize(serializer),
            Self::Vector(vs) => {
                let mut seq = serializer.serialize_seq(Some(vs.len()))?;
                for v in vs {
                    seq.serialize_element(&Compact(*v))?;
                }
                seq.end()
            }
            Self::Shape(node) => node.serialize(serializer),
        }
    }
}

struct FieldsRef<'a>(&'a Fields);

impl Serialize for FieldsRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        write_fields(&mut map, self.0)?;
        map.end()
    }
}

fn write_fields<M: SerializeMap>(map: &mut M, fields: &Fields) -> Result<(), M::Error> {
    for (k, v) in fields {
        map.serialize_entry(k, v)?;
    }
    Ok(())
}

fn write_opt_number<M: SerializeMap>(
    map: &mut M,
    key: &'static str,
    v: Option<f64>,
) -> Result<(), M::Error> {
    match v {
        Some(v) => map.serialize_entry(key, &Compact(v)),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/serialize.rs"]
mod tests;
