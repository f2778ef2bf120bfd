//! tgspack turns Lottie JSON animations into animated-sticker (`.tgs`) artifacts that fit a
//! byte budget.
//!
//! The input is parsed into a typed document, then a cascade of increasingly destructive
//! strategies is tried until the gzip-compressed output fits:
//!
//! - [`compress_animation`] / [`compress_with`] run the whole pipeline
//! - [`parse`] / [`serialize`] / [`encode`] expose the individual stages
//! - [`normalize`], [`prune`], [`decimate`] and [`truncate`] are the reductions strategies
//!   are built from
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod document;
mod encode;
mod foundation;
mod pipeline;
mod platform;
mod transform;

pub use crate::config::CompressOpts;
pub use crate::document::invariants::check_invariants;
pub use crate::document::model::{
    AnimationDocument, Asset, Fields, Layer, Node, Transform, TransformProperty,
};
pub use crate::document::parse::{parse, validate};
pub use crate::document::property::{AnimatableProperty, KeyValue, Keyframe, Lerp, PropertyValue};
pub use crate::document::serialize::{serialize, serialize_pretty};
pub use crate::document::visit::{VisitMut, for_each_property};
pub use crate::encode::digest::{digest, digest_hex};
pub use crate::encode::gzip::{
    DEFAULT_GZIP_LEVEL, decode_tgs, encode, encode_with_level, gzip, is_gzip,
};
pub use crate::foundation::core::{DEFAULT_BUDGET_BYTES, Precision, Stride, TruncateFactor};
pub use crate::foundation::error::{InvariantViolation, ParseError, TgsError, TgsResult};
pub use crate::pipeline::orchestrator::{
    AttemptState, Orchestrator, compress_animation, compress_document, compress_with,
};
pub use crate::pipeline::report::{AttemptSummary, CompressionReport};
pub use crate::pipeline::strategy::{Step, Strategy, StrategyTable};
pub use crate::platform::{PlatformIssue, lint};
pub use crate::transform::decimate::decimate;
pub use crate::transform::normalize::normalize;
pub use crate::transform::prune::{PruneLevel, prune, pruned_keys};
pub use crate::transform::truncate::truncate;
