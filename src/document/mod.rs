pub(crate) mod invariants;
pub(crate) mod model;
pub(crate) mod parse;
pub(crate) mod property;
pub(crate) mod serialize;
pub(crate) mod visit;
