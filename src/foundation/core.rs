use std::num::NonZeroUsize;

use crate::foundation::error::{TgsError, TgsResult};

/// Hard size limit of an animated sticker artifact, in bytes.
pub const DEFAULT_BUDGET_BYTES: usize = 65_536;

/// Largest magnitude that is still emitted as a JSON integer (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Number of fractional digits kept by the numeric normalizer.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Precision(u8);

impl Precision {
    /// Upper bound on fractional digits.
    pub const MAX_DIGITS: u8 = 6;

    /// Create a validated precision (`0..=6` digits).
    pub fn new(digits: u8) -> TgsResult<Self> {
        if digits > Self::MAX_DIGITS {
            return Err(TgsError::config(format!(
                "precision must be <= {} digits, got {digits}",
                Self::MAX_DIGITS
            )));
        }
        Ok(Self(digits))
    }

    /// Precision for `digits`, capped at [`Self::MAX_DIGITS`].
    pub const fn saturating(digits: u8) -> Self {
        if digits > Self::MAX_DIGITS {
            Self(Self::MAX_DIGITS)
        } else {
            Self(digits)
        }
    }

    /// Fractional digits.
    pub fn digits(self) -> u8 {
        self.0
    }

    /// Fewest fractional digits that leave `v` unchanged, if at most [`Self::MAX_DIGITS`].
    pub fn fitting(v: f64) -> Option<Self> {
        (0..=Self::MAX_DIGITS).map(Self).find(|p| p.round(v) == v)
    }

    /// Round half away from zero to this precision.
    ///
    /// Values too large to scale exactly are returned unchanged.
    pub fn round(self, v: f64) -> f64 {
        let scale = 10f64.powi(i32::from(self.0));
        let scaled = v * scale;
        if !scaled.is_finite() || scaled.abs() >= MAX_EXACT_INT {
            return v;
        }
        let r = scaled.round() / scale;
        // Avoid emitting `-0`.
        if r == 0.0 { 0.0 } else { r }
    }
}

impl TryFrom<u8> for Precision {
    type Error = TgsError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<Precision> for u8 {
    fn from(p: Precision) -> Self {
        p.0
    }
}

/// Keyframe sampling stride used by the decimator; always non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Stride(NonZeroUsize);

impl Stride {
    /// Create a validated stride (`>= 1`).
    pub fn new(n: usize) -> TgsResult<Self> {
        NonZeroUsize::new(n)
            .map(Self)
            .ok_or_else(|| TgsError::config("decimation stride must be >= 1"))
    }

    /// Stride for `n`, treating zero as one.
    pub const fn saturating(n: usize) -> Self {
        match NonZeroUsize::new(n) {
            Some(n) => Self(n),
            None => Self(NonZeroUsize::MIN),
        }
    }

    /// Stride as a plain integer.
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for Stride {
    type Error = TgsError;

    fn try_from(v: usize) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<Stride> for usize {
    fn from(s: Stride) -> Self {
        s.get()
    }
}

/// Fraction of the play range kept by the truncator, in `(0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TruncateFactor(f64);

impl TruncateFactor {
    /// Keep the whole range.
    pub const FULL: Self = Self(1.0);

    /// Keep the first half.
    pub const HALF: Self = Self(0.5);

    /// Create a validated factor.
    pub fn new(f: f64) -> TgsResult<Self> {
        if !(f > 0.0 && f <= 1.0) {
            return Err(TgsError::config(format!(
                "truncate factor must be in (0, 1], got {f}"
            )));
        }
        Ok(Self(f))
    }

    /// Factor as a plain float.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for TruncateFactor {
    type Error = TgsError;

    fn try_from(v: f64) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<TruncateFactor> for f64 {
    fn from(f: TruncateFactor) -> Self {
        f.0
    }
}

/// Return `true` when `v` can be written as a JSON integer without loss.
pub(crate) fn is_whole(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v.abs() < MAX_EXACT_INT
}

/// JSON number for `v`, using the integer form when `v` is whole.
///
/// Returns `None` for non-finite values.
pub(crate) fn compact_number(v: f64) -> Option<serde_json::Number> {
    if is_whole(v) {
        return Some(serde_json::Number::from(v as i64));
    }
    serde_json::Number::from_f64(v)
}

/// Serializes an `f64` in its shortest JSON form (`100` rather than `100.0`).
pub(crate) struct Compact(pub(crate) f64);

impl serde::Serialize for Compact {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if is_whole(self.0) {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
