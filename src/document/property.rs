use crate::document::model::{Fields, Node};

/// Linear interpolation between two values of the same kind.
pub trait Lerp: Sized {
    /// Value at `t` in `[0, 1]` between `a` and `b`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec<f64> {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.iter().zip(b).map(|(x, y)| <f64 as Lerp>::lerp(x, y, t)).collect()
    }
}

/// Value carried by a keyframe or a static property.
#[derive(Clone, Debug, PartialEq)]
pub enum KeyValue {
    /// Bare number.
    Scalar(f64),
    /// All-numeric array (position, scale, color, `[opacity]`, ...).
    Vector(Vec<f64>),
    /// Anything else: bezier shapes, text documents, gradient payloads.
    Shape(Node),
}

impl KeyValue {
    /// Interpolate toward `other`; `None` when the values are not numeric or differ in arity.
    pub fn lerp(&self, other: &Self, t: f64) -> Option<Self> {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => {
                Some(Self::Scalar(<f64 as Lerp>::lerp(a, b, t)))
            }
            (Self::Vector(a), Self::Vector(b)) if a.len() == b.len() => {
                Some(Self::Vector(<Vec<f64> as Lerp>::lerp(a, b, t)))
            }
            _ => None,
        }
    }

    /// Numeric components, if the value is numeric.
    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            Self::Scalar(v) => Some(std::slice::from_ref(v)),
            Self::Vector(v) => Some(v.as_slice()),
            Self::Shape(_) => None,
        }
    }
}

/// A `(time, value)` pair on a property's time axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Frame time in the owning layer's local timeline (`t`).
    pub time: f64,
    /// Value at `time` (`s`). The final keyframe of older exports may omit it.
    pub value: Option<KeyValue>,
    /// Legacy end value of the segment starting here (`e`).
    pub end: Option<KeyValue>,
    /// Easing handles, hold flag, spatial tangents and unknown keys.
    pub extra: Fields,
}

impl Keyframe {
    /// Keyframe with a value and no easing data.
    pub fn new(time: f64, value: KeyValue) -> Self {
        Self {
            time,
            value: Some(value),
            end: None,
            extra: Fields::new(),
        }
    }

    /// Return `true` for a hold keyframe (`"h": 1`): its value stays until the next keyframe.
    pub fn is_hold(&self) -> bool {
        match self.extra.get("h") {
            Some(Node::Leaf(serde_json::Value::Number(n))) => n.as_f64() == Some(1.0),
            Some(Node::Leaf(serde_json::Value::Bool(b))) => *b,
            _ => false,
        }
    }
}

/// Time behaviour of an animatable property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Constant value (`"a": 0`).
    Static(KeyValue),
    /// Keyframes sorted by non-decreasing time (`"a": 1`). Never empty.
    Keyframed(Vec<Keyframe>),
}

/// A document field that is either a constant or a keyframed time series.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatableProperty {
    /// Static value or keyframes.
    pub value: PropertyValue,
    /// Property index, expression and unknown keys (`ix`, `x`, `l`, ...).
    pub extra: Fields,
}

impl AnimatableProperty {
    /// Static property.
    pub fn constant(value: KeyValue) -> Self {
        Self {
            value: PropertyValue::Static(value),
            extra: Fields::new(),
        }
    }

    /// Keyframed property. Callers are responsible for passing at least one keyframe.
    pub fn keyframed(keys: Vec<Keyframe>) -> Self {
        Self {
            value: PropertyValue::Keyframed(keys),
            extra: Fields::new(),
        }
    }

    /// Return `true` for keyframed properties.
    pub fn is_animated(&self) -> bool {
        matches!(self.value, PropertyValue::Keyframed(_))
    }

    /// Keyframes, empty for static properties.
    pub fn keyframes(&self) -> &[Keyframe] {
        match &self.value {
            PropertyValue::Keyframed(keys) => keys,
            PropertyValue::Static(_) => &[],
        }
    }

    /// Number of keyframes (0 for static properties).
    pub fn keyframe_count(&self) -> usize {
        self.keyframes().len()
    }

    /// Keyframe times in order.
    pub fn times(&self) -> Vec<f64> {
        self.keyframes().iter().map(|k| k.time).collect()
    }

    /// Static value, if the property is static.
    pub fn static_value(&self) -> Option<&KeyValue> {
        match &self.value {
            PropertyValue::Static(v) => Some(v),
            PropertyValue::Keyframed(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/property.rs"]
mod tests;
