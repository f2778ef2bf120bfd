use crate::document::model::{AnimationDocument, Asset};
use crate::document::property::{AnimatableProperty, Keyframe, PropertyValue};
use crate::document::visit::{VisitMut, walk_property_mut};
use crate::foundation::core::Stride;

/// Keep every `stride`-th keyframe of each keyframed property with more than two keyframes.
///
/// The first and last keyframes are always kept, so the start and end states are unchanged
/// and only interior motion gets coarser. Properties inside assets are left alone.
#[tracing::instrument(level = "debug", skip(doc))]
pub fn decimate(mut doc: AnimationDocument, stride: Stride) -> AnimationDocument {
    if stride.get() == 1 {
        return doc;
    }
    let mut d = Decimator { stride, dropped: 0 };
    d.visit_document_mut(&mut doc);
    tracing::debug!(dropped = d.dropped, "decimated keyframes");
    doc
}

/// Indices retained from a list of `len` keyframes: every `stride`-th one plus the last.
pub(crate) fn retained_indices(len: usize, stride: Stride) -> Vec<usize> {
    if len <= 2 {
        return (0..len).collect();
    }
    let mut idx: Vec<usize> = (0..len).step_by(stride.get()).collect();
    if idx.last() != Some(&(len - 1)) {
        idx.push(len - 1);
    }
    idx
}

pub(crate) fn decimate_keys(keys: Vec<Keyframe>, stride: Stride) -> Vec<Keyframe> {
    let len = keys.len();
    let keep = retained_indices(len, stride);
    if keep.len() == len {
        return keys;
    }
    let mut keep = keep.into_iter().peekable();
    let mut out: Vec<Keyframe> = keys
        .into_iter()
        .enumerate()
        .filter_map(|(i, k)| {
            if keep.peek() == Some(&i) {
                keep.next();
                Some(k)
            } else {
                None
            }
        })
        .collect();

    // Legacy keyframes carry their segment's end value; it now ends at the next kept key.
    for i in 0..out.len().saturating_sub(1) {
        if out[i].end.is_some() {
            if let Some(next) = out[i + 1].value.clone() {
                out[i].end = Some(next);
            }
        }
    }
    out
}

struct Decimator {
    stride: Stride,
    dropped: usize,
}

impl VisitMut for Decimator {
    fn visit_asset_mut(&mut self, _asset: &mut Asset) {}

    fn visit_property_mut(&mut self, prop: &mut AnimatableProperty) {
        if let PropertyValue::Keyframed(keys) = &mut prop.value {
            let before = keys.len();
            *keys = decimate_keys(std::mem::take(keys), self.stride);
            self.dropped += before - keys.len();
        }
        walk_property_mut(self, prop);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/decimate.rs"]
mod tests;
