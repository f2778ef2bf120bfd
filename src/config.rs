use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::encode::gzip::DEFAULT_GZIP_LEVEL;
use crate::foundation::core::DEFAULT_BUDGET_BYTES;
use crate::foundation::error::{TgsError, TgsResult};
use crate::pipeline::strategy::StrategyTable;

/// Options for one compression request.
///
/// Passed explicitly to [`crate::compress_with`]; nothing is read from global state.
/// Every field has a default, so a JSON options file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressOpts {
    /// Maximum artifact size in bytes.
    pub budget_bytes: usize,
    /// gzip level, `0..=9`.
    pub gzip_level: u32,
    /// Strategies tried in order.
    pub strategies: StrategyTable,
    /// Append platform lint findings to the report.
    pub lint: bool,
}

impl Default for CompressOpts {
    fn default() -> Self {
        Self {
            budget_bytes: DEFAULT_BUDGET_BYTES,
            gzip_level: DEFAULT_GZIP_LEVEL,
            strategies: StrategyTable::default(),
            lint: true,
        }
    }
}

impl CompressOpts {
    /// Default options with a different budget.
    pub fn with_budget(budget_bytes: usize) -> Self {
        Self {
            budget_bytes,
            ..Self::default()
        }
    }

    /// Parse options from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> TgsResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| TgsError::config(format!("parse options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TgsResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| TgsError::io(format!("open options '{}': {e}", path.display())))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check value ranges and the strategy table.
    pub fn validate(&self) -> TgsResult<()> {
        if self.budget_bytes == 0 {
            return Err(TgsError::config("budget_bytes must be > 0"));
        }
        if self.gzip_level > 9 {
            return Err(TgsError::config(format!(
                "gzip_level must be in 0..=9, got {}",
                self.gzip_level
            )));
        }
        self.strategies.validate()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
