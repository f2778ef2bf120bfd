use crate::document::model::{AnimationDocument, Asset, Layer};
use crate::document::property::{AnimatableProperty, KeyValue, Keyframe, PropertyValue};
use crate::document::visit::{VisitMut, walk_layer_mut, walk_property_mut};
use crate::foundation::core::{Precision, TruncateFactor};

/// Shorten the play range to `factor` of its length and drop keyframes past the new end.
///
/// `new_out = ip + ceil((op - ip) * factor)`, never beyond the current out-point, so the
/// duration can only shrink. Each layer cuts at its own local time for `new_out`. A property
/// that loses keyframes gets a terminal keyframe at the cut holding the value shown there,
/// interpolated at its neighbours' precision or held after a hold keyframe. A property
/// that would lose all of them becomes static.
#[tracing::instrument(level = "debug", skip(doc))]
pub fn truncate(mut doc: AnimationDocument, factor: TruncateFactor) -> AnimationDocument {
    let new_out = cut_frame(&doc, factor);
    if new_out >= doc.out_point {
        return doc;
    }

    let mut t = Truncator {
        new_out,
        cut: new_out,
        dropped: 0,
    };
    for layer in &mut doc.layers {
        t.visit_layer_mut(layer);
    }
    tracing::debug!(
        from = doc.out_point,
        to = new_out,
        dropped = t.dropped,
        "truncated play range"
    );
    doc.out_point = new_out;
    doc
}

/// New out-point for `factor`.
pub(crate) fn cut_frame(doc: &AnimationDocument, factor: TruncateFactor) -> f64 {
    let kept = (doc.duration_frames() * factor.get()).ceil();
    (doc.in_point + kept).min(doc.out_point)
}

/// Cut a keyframe list at local time `cut`. Returns the new property value.
pub(crate) fn truncate_keys(keys: Vec<Keyframe>, cut: f64) -> PropertyValue {
    let split = keys.partition_point(|k| k.time < cut);
    if split == keys.len() {
        return PropertyValue::Keyframed(keys);
    }
    if split == 0 {
        return degrade(keys);
    }

    let mut kept = keys;
    let dropped = kept.split_off(split);
    let next = &dropped[0];
    let last = &kept[split - 1];

    let target = next.value.as_ref().or(last.end.as_ref());
    let at_cut = match (last.value.as_ref(), target) {
        (Some(a), _) if last.is_hold() => Some(a.clone()),
        (Some(a), Some(b)) => {
            let span = next.time - last.time;
            let t = if span > 0.0 {
                ((cut - last.time) / span).clamp(0.0, 1.0)
            } else {
                1.0
            };
            a.lerp(b, t)
                .map(|v| quantize(v, a, b))
                .or_else(|| Some(a.clone()))
        }
        (Some(a), None) => Some(a.clone()),
        (None, _) => last.end.clone(),
    };

    if let Some(value) = at_cut {
        if let Some(prev) = kept.last_mut() {
            if prev.end.is_some() {
                prev.end = Some(value.clone());
            }
        }
        kept.push(Keyframe::new(cut, value));
    }
    PropertyValue::Keyframed(kept)
}

/// Round an interpolated value to the fractional digits its endpoints use.
fn quantize(value: KeyValue, a: &KeyValue, b: &KeyValue) -> KeyValue {
    let digits = a
        .as_numbers()
        .into_iter()
        .chain(b.as_numbers())
        .flatten()
        .try_fold(Precision::saturating(0), |acc, &v| {
            Precision::fitting(v).map(|p| acc.max(p))
        });
    let Some(p) = digits else {
        return value;
    };
    match value {
        KeyValue::Scalar(v) => KeyValue::Scalar(p.round(v)),
        KeyValue::Vector(vs) => KeyValue::Vector(vs.into_iter().map(|v| p.round(v)).collect()),
        shape => shape,
    }
}

/// Every keyframe is at or past the cut: hold the first keyframe's value.
///
/// A first keyframe without any value is kept alone so the list never becomes empty.
fn degrade(mut keys: Vec<Keyframe>) -> PropertyValue {
    keys.truncate(1);
    match keys.pop() {
        Some(Keyframe {
            value: Some(v), ..
        })
        | Some(Keyframe {
            value: None,
            end: Some(v),
            ..
        }) => PropertyValue::Static(v),
        Some(first) => PropertyValue::Keyframed(vec![first]),
        None => PropertyValue::Keyframed(keys),
    }
}

struct Truncator {
    new_out: f64,
    cut: f64,
    dropped: usize,
}

impl VisitMut for Truncator {
    fn visit_asset_mut(&mut self, _asset: &mut Asset) {}

    fn visit_layer_mut(&mut self, layer: &mut Layer) {
        self.cut = layer.local_time(self.new_out);
        walk_layer_mut(self, layer);
        if let Some(op) = layer.out_point {
            if op > self.new_out && layer.in_point.is_none_or(|ip| ip < self.new_out) {
                layer.out_point = Some(self.new_out);
            }
        }
    }

    fn visit_property_mut(&mut self, prop: &mut AnimatableProperty) {
        if let PropertyValue::Keyframed(keys) = &mut prop.value {
            let cut = self.cut;
            self.dropped += keys.iter().filter(|k| k.time >= cut).count();
            prop.value = truncate_keys(std::mem::take(keys), cut);
        }
        walk_property_mut(self, prop);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/truncate.rs"]
mod tests;
