use crate::config::CompressOpts;
use crate::document::invariants::check_invariants;
use crate::document::model::AnimationDocument;
use crate::document::parse::parse;
use crate::encode::digest::digest_hex;
use crate::encode::gzip::encode_with_level;
use crate::foundation::error::{TgsError, TgsResult};
use crate::pipeline::report::{AttemptSummary, CompressionReport};
use crate::platform::lint;

/// Where the orchestrator is in its walk over the strategy table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptState {
    /// Nothing tried yet.
    Unattempted,
    /// Strategy `i` is next.
    Trying(usize),
    /// Strategy `i` met the budget.
    Succeeded(usize),
    /// Every strategy was tried and none met the budget.
    Exhausted,
}

impl AttemptState {
    /// Return `true` once no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Exhausted)
    }
}

struct Candidate {
    index: usize,
    doc: AnimationDocument,
    bytes: Vec<u8>,
}

/// Runs strategies in order against a byte budget and keeps the first that fits.
///
/// Each strategy starts from a fresh copy of the source document. When none fits, the
/// output of the last (most aggressive) strategy is kept and the report says so.
pub struct Orchestrator<'a> {
    source: AnimationDocument,
    opts: &'a CompressOpts,
    state: AttemptState,
    attempts: Vec<AttemptSummary>,
    last: Option<Candidate>,
}

impl<'a> Orchestrator<'a> {
    /// Prepare a run. Fails when `opts` is invalid (e.g. an empty strategy table).
    pub fn new(source: AnimationDocument, opts: &'a CompressOpts) -> TgsResult<Self> {
        opts.validate()?;
        Ok(Self {
            source,
            opts,
            state: AttemptState::Unattempted,
            attempts: Vec::with_capacity(opts.strategies.len()),
            last: None,
        })
    }

    /// Current state.
    pub fn state(&self) -> AttemptState {
        self.state
    }

    /// Perform one transition.
    ///
    /// `Trying(i)` applies and measures strategy `i`. Terminal states stay put.
    pub fn step(&mut self) -> TgsResult<AttemptState> {
        let next = match self.state {
            AttemptState::Unattempted => AttemptState::Trying(0),
            AttemptState::Trying(i) => {
                let fits = self.attempt(i)?;
                if fits {
                    AttemptState::Succeeded(i)
                } else if i + 1 < self.opts.strategies.len() {
                    AttemptState::Trying(i + 1)
                } else {
                    AttemptState::Exhausted
                }
            }
            done => done,
        };
        tracing::debug!(from = ?self.state, to = ?next, "orchestrator transition");
        self.state = next;
        Ok(next)
    }

    /// Drive the state machine to completion and build the report.
    pub fn run(mut self) -> TgsResult<(Vec<u8>, CompressionReport)> {
        while !self.state.is_terminal() {
            self.step()?;
        }
        self.finish()
    }

    fn attempt(&mut self, index: usize) -> TgsResult<bool> {
        let Some(strategy) = self.opts.strategies.as_slice().get(index) else {
            return Err(TgsError::config(format!("no strategy at index {index}")));
        };
        let doc = strategy.apply(self.source.clone());
        check_invariants(&doc, &strategy.name)?;
        let bytes = encode_with_level(&doc, self.opts.gzip_level)?;
        let fits = bytes.len() <= self.opts.budget_bytes;
        tracing::debug!(
            strategy = %strategy.name,
            size = bytes.len(),
            budget = self.opts.budget_bytes,
            fits,
            "strategy attempted"
        );
        self.attempts.push(AttemptSummary {
            strategy: strategy.name.clone(),
            size_bytes: bytes.len(),
        });
        self.last = Some(Candidate { index, doc, bytes });
        Ok(fits)
    }

    fn finish(self) -> TgsResult<(Vec<u8>, CompressionReport)> {
        let Some(Candidate { index, doc, bytes }) = self.last else {
            return Err(TgsError::config("no strategy was attempted"));
        };
        let met_budget = matches!(self.state, AttemptState::Succeeded(_));
        let strategy = self
            .opts
            .strategies
            .as_slice()
            .get(index)
            .map(|s| s.name.clone())
            .unwrap_or_default();

        let warnings: Vec<String> = if self.opts.lint {
            lint(&doc).iter().map(ToString::to_string).collect()
        } else {
            Vec::new()
        };
        for w in &warnings {
            tracing::warn!(warning = %w, "platform lint");
        }

        let report = CompressionReport {
            strategy,
            strategy_index: index,
            size_bytes: bytes.len(),
            budget_bytes: self.opts.budget_bytes,
            met_budget,
            keyframes_before: self.source.keyframe_count(),
            keyframes_after: doc.keyframe_count(),
            attempts: self.attempts,
            digest: digest_hex(&bytes),
            warnings,
        };
        if met_budget {
            tracing::info!(
                strategy = %report.strategy,
                size = report.size_bytes,
                budget = report.budget_bytes,
                "compressed within budget"
            );
        } else {
            tracing::warn!(
                strategy = %report.strategy,
                size = report.size_bytes,
                budget = report.budget_bytes,
                "no strategy met the budget; returning the most aggressive output"
            );
        }
        Ok((bytes, report))
    }
}

/// Parse `input` and compress it under `budget_bytes` with the default strategies.
///
/// Malformed input fails with [`TgsError::Parse`] before any strategy runs. Missing the
/// budget is not an error: check [`CompressionReport::met_budget`].
#[tracing::instrument(skip(input), fields(len = input.len()))]
pub fn compress_animation(
    input: &[u8],
    budget_bytes: usize,
) -> TgsResult<(Vec<u8>, CompressionReport)> {
    compress_with(input, &CompressOpts::with_budget(budget_bytes))
}

/// Parse `input` and compress it with explicit options.
#[tracing::instrument(skip(input, opts), fields(len = input.len(), budget = opts.budget_bytes))]
pub fn compress_with(input: &[u8], opts: &CompressOpts) -> TgsResult<(Vec<u8>, CompressionReport)> {
    let doc = parse(input)?;
    compress_document(doc, opts)
}

/// Compress an already parsed document.
pub fn compress_document(
    doc: AnimationDocument,
    opts: &CompressOpts,
) -> TgsResult<(Vec<u8>, CompressionReport)> {
    Orchestrator::new(doc, opts)?.run()
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
