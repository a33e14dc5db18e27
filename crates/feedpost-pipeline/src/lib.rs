//! Caption generation and publishing pipeline.
//!
//! Takes the newest feed item, skips it when the account's latest post already
//! covers it, asks the generator for a caption, bounds and cleans the caption,
//! assembles the post and publishes it. Every run ends in exactly one
//! terminal state; see [`pipeline`] for the state machine.

pub mod assemble;
pub mod caption;
pub mod dedup;
pub mod dry_run;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod sanitize;

pub use assemble::PostAssembler;
pub use caption::{constrain, enforce, RawCaption, SanitizedCaption};
pub use dedup::{ComparisonKey, DuplicateGuard};
pub use dry_run::DryRunPlatform;
pub use error::{AssembleError, PipelineError};
pub use pipeline::{
    AbortReason, NoShortener, PipelineSettings, PublishPipeline, RunOutcome, RunReport, RunState,
    Severity, StatusReport,
};
pub use prompt::GenerationRequest;
pub use sanitize::ContentSanitizer;
