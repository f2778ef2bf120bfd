//! Budget-driven strategy cascade.

pub(crate) mod orchestrator;
pub(crate) mod report;
pub(crate) mod strategy;
