use std::collections::BTreeSet;
use std::fmt;

use crate::document::model::AnimationDocument;
use crate::foundation::core::{Precision, Stride, TruncateFactor};
use crate::foundation::error::{TgsError, TgsResult};
use crate::transform::decimate::decimate;
use crate::transform::normalize::normalize;
use crate::transform::prune::{PruneLevel, prune};
use crate::transform::truncate::truncate;

/// One transformation inside a strategy.
///
/// Serialized externally tagged, e.g. `{"decimate": {"stride": 2}}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Round floating-point leaves.
    Normalize {
        /// Fractional digits kept.
        precision: Precision,
    },
    /// Remove non-essential metadata.
    Prune {
        /// Aggressiveness tier.
        level: PruneLevel,
    },
    /// Thin keyframes, keeping both endpoints.
    Decimate {
        /// Keep every `stride`-th keyframe.
        stride: Stride,
    },
    /// Shorten the play range.
    Truncate {
        /// Fraction of the play range kept.
        factor: TruncateFactor,
    },
}

impl Step {
    /// Apply this step to `doc`.
    pub fn apply(&self, doc: AnimationDocument) -> AnimationDocument {
        match *self {
            Self::Normalize { precision } => normalize(doc, precision),
            Self::Prune { level } => prune(doc, level),
            Self::Decimate { stride } => decimate(doc, stride),
            Self::Truncate { factor } => truncate(doc, factor),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normalize { precision } => write!(f, "normalize({})", precision.digits()),
            Self::Prune { level } => {
                let name = match level {
                    PruneLevel::Low => "low",
                    PruneLevel::Medium => "medium",
                    PruneLevel::High => "high",
                };
                write!(f, "prune({name})")
            }
            Self::Decimate { stride } => write!(f, "decimate({})", stride.get()),
            Self::Truncate { factor } => write!(f, "truncate({})", factor.get()),
        }
    }
}

/// A named, ordered composition of steps. An empty step list is the identity.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Strategy {
    /// Name shown in reports.
    pub name: String,
    /// Steps applied left to right.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Strategy {
    /// Build a strategy.
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Serialize and compress only.
    pub fn identity() -> Self {
        Self::new("identity", Vec::new())
    }

    /// Run every step in order.
    pub fn apply(&self, doc: AnimationDocument) -> AnimationDocument {
        self.steps.iter().fold(doc, |doc, step| step.apply(doc))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "{}: serialize + compress", self.name);
        }
        write!(f, "{}: ", self.name)?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

/// Strategies ordered from least to most destructive.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StrategyTable(Vec<Strategy>);

impl StrategyTable {
    /// Build and validate a table.
    pub fn new(strategies: Vec<Strategy>) -> TgsResult<Self> {
        let table = Self(strategies);
        table.validate()?;
        Ok(table)
    }

    /// Check that the table is non-empty and names are present and unique.
    pub fn validate(&self) -> TgsResult<()> {
        if self.0.is_empty() {
            return Err(TgsError::config("strategy table is empty"));
        }
        let mut seen = BTreeSet::new();
        for (i, s) in self.0.iter().enumerate() {
            if s.name.trim().is_empty() {
                return Err(TgsError::config(format!("strategy #{i} has an empty name")));
            }
            if !seen.insert(s.name.as_str()) {
                return Err(TgsError::config(format!(
                    "duplicate strategy name `{}`",
                    s.name
                )));
            }
        }
        Ok(())
    }

    /// Strategies in order.
    pub fn as_slice(&self) -> &[Strategy] {
        &self.0
    }

    /// Number of strategies.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` when the table holds no strategy.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalize runs last in every default strategy.
impl Default for StrategyTable {
    fn default() -> Self {
        Self(vec![
            Strategy::identity(),
            Strategy::new(
                "light",
                vec![
                    Step::Prune {
                        level: PruneLevel::Low,
                    },
                    Step::Normalize {
                        precision: Precision::saturating(3),
                    },
                ],
            ),
            Strategy::new(
                "decimate",
                vec![
                    Step::Decimate {
                        stride: Stride::saturating(2),
                    },
                    Step::Prune {
                        level: PruneLevel::High,
                    },
                    Step::Normalize {
                        precision: Precision::saturating(2),
                    },
                ],
            ),
            Strategy::new(
                "aggressive",
                vec![
                    Step::Truncate {
                        factor: TruncateFactor::HALF,
                    },
                    Step::Decimate {
                        stride: Stride::saturating(4),
                    },
                    Step::Prune {
                        level: PruneLevel::High,
                    },
                    Step::Normalize {
                        precision: Precision::saturating(2),
                    },
                ],
            ),
        ])
    }
}

impl<'a> IntoIterator for &'a StrategyTable {
    type Item = &'a Strategy;
    type IntoIter = std::slice::Iter<'a, Strategy>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/strategy.rs"]
mod tests;
