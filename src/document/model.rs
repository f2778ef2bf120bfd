use std::collections::BTreeMap;

use crate::document::property::AnimatableProperty;

/// Opaque key/value block retained verbatim unless a transformation understands a key.
pub type Fields = BTreeMap<String, Node>;

/// A node of the document tree that the model has no dedicated type for.
///
/// Animatable properties are recognised wherever they appear (shapes, effects, precomp
/// layers), so transformations reach them without knowing the surrounding schema.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// `null`, boolean, number or string.
    Leaf(serde_json::Value),
    /// Ordered list.
    Array(Vec<Node>),
    /// Object without a dedicated model type.
    Object(Fields),
    /// Animatable property (`{"a": 0|1, "k": ...}`).
    Property(Box<AnimatableProperty>),
}

impl Node {
    /// Numeric value of a leaf, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Leaf(serde_json::Value::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    /// Return the property when this node is one.
    pub fn as_property(&self) -> Option<&AnimatableProperty> {
        match self {
            Self::Property(p) => Some(p.as_ref()),
            _ => None,
        }
    }

    /// Mutable access to the property when this node is one.
    pub fn as_property_mut(&mut self) -> Option<&mut AnimatableProperty> {
        match self {
            Self::Property(p) => Some(p.as_mut()),
            _ => None,
        }
    }
}

impl From<AnimatableProperty> for Node {
    fn from(p: AnimatableProperty) -> Self {
        Self::Property(Box::new(p))
    }
}

/// A complete animation document (Lottie / TGS root object).
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationDocument {
    /// Frames per second (`fr`), always positive.
    pub frame_rate: f64,
    /// First frame of the play range (`ip`).
    pub in_point: f64,
    /// End frame of the play range (`op`), strictly after `in_point`.
    pub out_point: f64,
    /// Canvas width in pixels (`w`).
    pub width: u32,
    /// Canvas height in pixels (`h`).
    pub height: u32,
    /// Ordered layers (`layers`), owned by the document.
    pub layers: Vec<Layer>,
    /// Ordered assets (`assets`), passed through unless a transformation opts in.
    pub assets: Vec<Asset>,
    /// Every other root key (`v`, `nm`, `ddd`, `tgs`, `meta`, `markers`, `fonts`, ...).
    pub extra: Fields,
}

impl AnimationDocument {
    /// Play range length in frames.
    pub fn duration_frames(&self) -> f64 {
        self.out_point - self.in_point
    }

    /// Play range length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_frames() / self.frame_rate
    }

    /// Find an asset by identifier.
    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id.as_deref() == Some(id))
    }

    /// Total keyframes across every animatable property, assets included.
    pub fn keyframe_count(&self) -> usize {
        let mut n = 0;
        crate::document::visit::for_each_property(self, &mut |_, p| n += p.keyframe_count());
        n
    }
}

/// One layer of the document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layer {
    /// Transform block (`ks`).
    pub transform: Option<Transform>,
    /// Layer in-point (`ip`).
    pub in_point: Option<f64>,
    /// Layer out-point (`op`).
    pub out_point: Option<f64>,
    /// Start offset of the layer's local timeline (`st`).
    pub start_time: Option<f64>,
    /// Time stretch (`sr`).
    pub stretch: Option<f64>,
    /// Weak reference to an [`Asset`] by identifier (`refId`).
    pub asset_ref: Option<String>,
    /// Every other layer key (`ty`, `ind`, `parent`, `shapes`, `ef`, ...).
    pub extra: Fields,
}

impl Layer {
    /// Convert a composition frame into this layer's local keyframe time.
    pub fn local_time(&self, frame: f64) -> f64 {
        let start = self.start_time.unwrap_or(0.0);
        let stretch = match self.stretch {
            Some(s) if s > 0.0 => s,
            _ => 1.0,
        };
        (frame - start) / stretch
    }
}

/// Well-known entries of a layer transform block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformProperty {
    /// `a`
    Anchor,
    /// `p`
    Position,
    /// `s`
    Scale,
    /// `r`
    Rotation,
    /// `o`
    Opacity,
    /// `sk`
    Skew,
    /// `sa`
    SkewAxis,
}

impl TransformProperty {
    /// Wire key of this entry.
    pub fn key(self) -> &'static str {
        match self {
            Self::Anchor => "a",
            Self::Position => "p",
            Self::Scale => "s",
            Self::Rotation => "r",
            Self::Opacity => "o",
            Self::Skew => "sk",
            Self::SkewAxis => "sa",
        }
    }
}

/// Layer transform block: property name to animatable property.
///
/// Entries that are not properties (split position `{"s": true, "x": .., "y": ..}`,
/// unknown vendor keys) are kept as opaque nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transform {
    /// Raw entries keyed by wire name.
    pub entries: Fields,
}

impl Transform {
    /// Look up a well-known transform property.
    pub fn get(&self, which: TransformProperty) -> Option<&AnimatableProperty> {
        self.entries.get(which.key()).and_then(Node::as_property)
    }

    /// Mutable lookup of a well-known transform property.
    pub fn get_mut(&mut self, which: TransformProperty) -> Option<&mut AnimatableProperty> {
        self.entries
            .get_mut(which.key())
            .and_then(Node::as_property_mut)
    }

    /// Insert or replace a well-known transform property.
    pub fn set(&mut self, which: TransformProperty, prop: AnimatableProperty) {
        self.entries.insert(which.key().to_string(), prop.into());
    }
}

/// An asset (image, precomposition, ...). Opaque apart from its identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Asset {
    /// Identifier layers refer to via `refId`.
    pub id: Option<String>,
    /// Everything else.
    pub extra: Fields,
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
