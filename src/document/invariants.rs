use crate::document::model::AnimationDocument;
use crate::document::property::PropertyValue;
use crate::document::visit::for_each_property;
use crate::foundation::error::InvariantViolation;

/// Check the model invariants that every transformation must preserve.
///
/// - frame rate positive, `op - ip > 0`
/// - keyframed properties hold at least one keyframe, with non-decreasing times
///
/// `stage` names the strategy or transformation being checked, for the error message.
pub fn check_invariants(doc: &AnimationDocument, stage: &str) -> Result<(), InvariantViolation> {
    let violation = |path: &str, message: String| InvariantViolation {
        stage: stage.to_string(),
        path: path.to_string(),
        message,
    };

    if !(doc.frame_rate > 0.0) {
        return Err(violation("fr", format!("frame rate {} is not positive", doc.frame_rate)));
    }
    if !(doc.duration_frames() > 0.0) {
        return Err(violation(
            "op",
            format!("empty play range [{}, {}]", doc.in_point, doc.out_point),
        ));
    }

    let mut first: Option<InvariantViolation> = None;
    for_each_property(doc, &mut |path, prop| {
        if first.is_some() {
            return;
        }
        let PropertyValue::Keyframed(keys) = &prop.value else {
            return;
        };
        if keys.is_empty() {
            first = Some(violation(path, "keyframed property has no keyframes".to_string()));
        } else if !keys.windows(2).all(|w| w[0].time <= w[1].time) {
            first = Some(violation(path, "keyframe times are not sorted".to_string()));
        }
    });
    match first {
        Some(v) => Err(v),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/invariants.rs"]
mod tests;
