use std::fmt;

/// Which batch driver produced a [`JobReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    /// `Repository::ingest`, driving a `discover`/`process`/`catalog` pipeline.
    Ingest,

    /// `Repository::prune`, driving `uncatalog` calls.
    Prune,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobStage::Ingest => "ingest",
            JobStage::Prune => "prune",
        })
    }
}

/// The outcome of processing a single product within a batch operation.
///
/// Grounded in `original_source/stac_repository/lib/job_report.py`'s
/// `JobState`; `InProgress` is represented here as the absence of a
/// report rather than a variant, since a Rust `ingest`/`prune` surfaces
/// reports only once an item has finished (see [`crate::JobReport`]'s
/// doc for how progress is communicated instead).
#[derive(Debug)]
#[non_exhaustive]
pub enum JobOutcome {
    /// The product was cataloged or uncataloged successfully.
    Success,

    /// The product was already cataloged under an identical version and was skipped.
    Skipped,

    /// The product failed; the error has already been folded into the batch's `ErrorGroup`.
    Failure(String),
}

/// A per-product progress record emitted during `Repository::ingest`/`prune`.
///
/// One is produced for every discovered source or requested id, in the
/// order processed, satisfying `spec.md` §7's "batch operations always
/// show per-item progress."
#[derive(Debug)]
pub struct JobReport {
    /// The source href (`ingest`) or product id (`prune`) this report is about.
    pub source: String,

    /// Which batch driver produced this report.
    pub stage: JobStage,

    /// What happened to this product.
    pub outcome: JobOutcome,
}

impl JobReport {
    /// Creates a new report.
    pub fn new(source: impl Into<String>, stage: JobStage, outcome: JobOutcome) -> JobReport {
        JobReport {
            source: source.into(),
            stage,
            outcome,
        }
    }
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            JobOutcome::Success => write!(f, "[{}] {}: ok", self.stage, self.source),
            JobOutcome::Skipped => write!(f, "[{}] {}: skipped", self.stage, self.source),
            JobOutcome::Failure(message) => {
                write!(f, "[{}] {}: failed: {}", self.stage, self.source, message)
            }
        }
    }
}
