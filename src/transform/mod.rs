//! Document-to-document reductions applied by compression strategies.
//!
//! Every transformation takes the document by value and returns the reduced document; none
//! of them can fail on a valid input.

pub(crate) mod decimate;
pub(crate) mod normalize;
pub(crate) mod prune;
pub(crate) mod truncate;
