use std::fmt;

/// Size of one strategy's artifact.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AttemptSummary {
    /// Strategy name.
    pub strategy: String,
    /// Encoded size in bytes.
    pub size_bytes: usize,
}

/// Outcome of one compression request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CompressionReport {
    /// Strategy whose output was returned.
    pub strategy: String,
    /// Position of that strategy in the table.
    pub strategy_index: usize,
    /// Size of the returned artifact in bytes.
    pub size_bytes: usize,
    /// Byte budget the request was run against.
    pub budget_bytes: usize,
    /// Whether `size_bytes <= budget_bytes`.
    pub met_budget: bool,
    /// Keyframes in the parsed input.
    pub keyframes_before: usize,
    /// Keyframes in the returned artifact.
    pub keyframes_after: usize,
    /// Every strategy tried, in order.
    pub attempts: Vec<AttemptSummary>,
    /// xxh3 fingerprint of the artifact, hex.
    pub digest: String,
    /// Non-fatal findings (platform lint).
    pub warnings: Vec<String>,
}

impl CompressionReport {
    /// Bytes left under the budget; negative when it was exceeded.
    pub fn headroom(&self) -> i64 {
        self.budget_bytes as i64 - self.size_bytes as i64
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.met_budget {
            "within budget"
        } else {
            "OVER BUDGET"
        };
        writeln!(
            f,
            "{} bytes / {} budget ({verdict}) via strategy `{}`",
            self.size_bytes, self.budget_bytes, self.strategy
        )?;
        writeln!(
            f,
            "keyframes: {} -> {}",
            self.keyframes_before, self.keyframes_after
        )?;
        for a in &self.attempts {
            writeln!(f, "  tried {:<12} {:>8} bytes", a.strategy, a.size_bytes)?;
        }
        for w in &self.warnings {
            writeln!(f, "warning: {w}")?;
        }
        write!(f, "digest: {}", self.digest)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/report.rs"]
mod tests;
