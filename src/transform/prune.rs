use crate::document::model::{AnimationDocument, Asset, Fields, Layer, Node};
use crate::document::property::{AnimatableProperty, Keyframe};
use crate::document::visit::{
    VisitMut, walk_asset_mut, walk_document_mut, walk_fields_mut, walk_keyframe_mut,
    walk_layer_mut, walk_property_mut,
};

/// Pruning aggressiveness. Each tier removes everything the previous tier removes, plus more.
///
/// - `Low`: names and authoring annotations (`nm`, `mn`, `cl`, `ln`, root `meta`), and
///   expressions (`x`), which address layers and properties by those names and indices.
/// - `Medium`: editor hints (`ix`, `cix`, `np`, root `markers`, keyframe `n`) and flags
///   equal to their player default (`ddd: 0`, `ao: 0`, `bm: 0`, `hd: false`, `sr: 1`).
/// - `High`: every rule above also applied inside assets.
///
/// Typed fields (timing, canvas, layers, assets, keyframe data, `id`/`refId`) cannot be
/// reached by any rule.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PruneLevel {
    /// Names, annotations and expressions.
    Low,
    /// Plus editor hints and default-valued flags.
    Medium,
    /// Plus the same rules inside assets.
    High,
}

impl PruneLevel {
    /// All tiers, least aggressive first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    fn tiers(self) -> &'static [Tier] {
        &TIERS[..=self as usize]
    }
}

#[derive(Clone, Copy, Debug)]
enum Rule {
    Always(&'static str),
    IfDefault(&'static str, DefaultValue),
}

#[derive(Clone, Copy, Debug)]
enum DefaultValue {
    Int(i64),
    Bool(bool),
}

impl Rule {
    fn key(self) -> &'static str {
        match self {
            Self::Always(k) | Self::IfDefault(k, _) => k,
        }
    }

    fn matches(self, key: &str, node: &Node) -> bool {
        match self {
            Self::Always(k) => k == key,
            Self::IfDefault(k, default) => {
                if k != key {
                    return false;
                }
                match (default, node) {
                    (DefaultValue::Int(d), Node::Leaf(serde_json::Value::Number(n))) => {
                        n.as_f64() == Some(d as f64)
                    }
                    (DefaultValue::Bool(d), Node::Leaf(serde_json::Value::Bool(b))) => *b == d,
                    _ => false,
                }
            }
        }
    }
}

/// Keys removed by one tier, split by where they may appear.
struct Tier {
    anywhere: &'static [Rule],
    root: &'static [&'static str],
    keyframe: &'static [&'static str],
    property: &'static [&'static str],
    layer_default_stretch: bool,
    assets: bool,
}

static TIERS: [Tier; 3] = [
    Tier {
        anywhere: &[
            Rule::Always("nm"),
            Rule::Always("mn"),
            Rule::Always("cl"),
            Rule::Always("ln"),
        ],
        root: &["meta"],
        keyframe: &[],
        property: &["x"],
        layer_default_stretch: false,
        assets: false,
    },
    Tier {
        anywhere: &[
            Rule::Always("ix"),
            Rule::Always("cix"),
            Rule::Always("np"),
            Rule::IfDefault("ddd", DefaultValue::Int(0)),
            Rule::IfDefault("ao", DefaultValue::Int(0)),
            Rule::IfDefault("bm", DefaultValue::Int(0)),
            Rule::IfDefault("hd", DefaultValue::Bool(false)),
        ],
        root: &["markers"],
        keyframe: &["n"],
        property: &[],
        layer_default_stretch: true,
        assets: false,
    },
    Tier {
        anywhere: &[],
        root: &[],
        keyframe: &[],
        property: &[],
        layer_default_stretch: false,
        assets: true,
    },
];

/// Remove non-essential metadata up to `level`.
///
/// The result is still a valid document: only opaque keys listed by the active tiers go.
#[tracing::instrument(level = "debug", skip(doc))]
pub fn prune(mut doc: AnimationDocument, level: PruneLevel) -> AnimationDocument {
    let mut pruner = Pruner {
        tiers: level.tiers(),
        removed: 0,
    };
    pruner.visit_document_mut(&mut doc);
    tracing::debug!(removed = pruner.removed, "pruned metadata");
    doc
}

/// Every key any tier up to `level` may remove. Used to document asset-level effects.
pub fn pruned_keys(level: PruneLevel) -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = level
        .tiers()
        .iter()
        .flat_map(|t| {
            t.anywhere
                .iter()
                .map(|r| r.key())
                .chain(t.root.iter().copied())
                .chain(t.keyframe.iter().copied())
                .chain(t.property.iter().copied())
        })
        .collect();
    if level >= PruneLevel::Medium {
        keys.push("sr");
    }
    keys.sort_unstable();
    keys.dedup();
    keys
}

struct Pruner {
    tiers: &'static [Tier],
    removed: usize,
}

impl Pruner {
    fn remove_keys<'a>(&mut self, fields: &mut Fields, keys: impl Iterator<Item = &'a str>) {
        for key in keys {
            if fields.remove(key).is_some() {
                self.removed += 1;
            }
        }
    }
}

impl VisitMut for Pruner {
    fn visit_document_mut(&mut self, doc: &mut AnimationDocument) {
        let tiers = self.tiers;
        self.remove_keys(&mut doc.extra, tiers.iter().flat_map(|t| t.root.iter().copied()));
        walk_document_mut(self, doc);
    }

    fn visit_layer_mut(&mut self, layer: &mut Layer) {
        if self.tiers.iter().any(|t| t.layer_default_stretch) && layer.stretch == Some(1.0) {
            layer.stretch = None;
            self.removed += 1;
        }
        walk_layer_mut(self, layer);
    }

    fn visit_asset_mut(&mut self, asset: &mut Asset) {
        if self.tiers.iter().any(|t| t.assets) {
            walk_asset_mut(self, asset);
        }
    }

    fn visit_fields_mut(&mut self, fields: &mut Fields) {
        let tiers = self.tiers;
        let before = fields.len();
        fields.retain(|key, node| {
            !tiers
                .iter()
                .flat_map(|t| t.anywhere.iter())
                .any(|rule| rule.matches(key, node))
        });
        self.removed += before - fields.len();
        walk_fields_mut(self, fields);
    }

    fn visit_property_mut(&mut self, prop: &mut AnimatableProperty) {
        let tiers = self.tiers;
        self.remove_keys(&mut prop.extra, tiers.iter().flat_map(|t| t.property.iter().copied()));
        walk_property_mut(self, prop);
    }

    fn visit_keyframe_mut(&mut self, key: &mut Keyframe) {
        let tiers = self.tiers;
        self.remove_keys(&mut key.extra, tiers.iter().flat_map(|t| t.keyframe.iter().copied()));
        walk_keyframe_mut(self, key);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/prune.rs"]
mod tests;
