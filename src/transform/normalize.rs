use crate::document::model::AnimationDocument;
use crate::document::visit::VisitMut;
use crate::foundation::core::{Precision, compact_number};

/// Keys holding frame indices or identifiers; their numbers are never rounded.
const EXACT_KEYS: &[&str] = &[
    "t", "ip", "op", "st", "fr", "ind", "parent", "ty", "refId", "id", "w", "h",
];

/// Round every floating-point leaf to `precision` fractional digits.
///
/// The result has the same keys and list lengths as the input; only magnitudes change.
/// Frame indices (`t`, `ip`, `op`, `st`, ...) and integral numbers are left alone.
/// Assets are included since no key is removed.
#[tracing::instrument(level = "debug", skip(doc))]
pub fn normalize(mut doc: AnimationDocument, precision: Precision) -> AnimationDocument {
    Normalizer { precision }.visit_document_mut(&mut doc);
    doc
}

struct Normalizer {
    precision: Precision,
}

impl VisitMut for Normalizer {
    fn visit_number_mut(&mut self, key: Option<&str>, n: &mut serde_json::Number) {
        if !n.is_f64() || key.is_some_and(|k| EXACT_KEYS.contains(&k)) {
            return;
        }
        if let Some(v) = n.as_f64() {
            if let Some(rounded) = compact_number(self.precision.round(v)) {
                *n = rounded;
            }
        }
    }

    fn visit_float_mut(&mut self, v: &mut f64) {
        *v = self.precision.round(*v);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/normalize.rs"]
mod tests;
