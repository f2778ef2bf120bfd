//! Final artifact encoding: gzip framing and output fingerprints.

pub(crate) mod digest;
pub(crate) mod gzip;
