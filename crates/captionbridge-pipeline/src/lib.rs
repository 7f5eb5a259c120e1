//! captionbridge pipeline
//!
//! Resolves queued subtitle files to remote video assets and uploads them one
//! at a time. Remote services are reached through the traits in [`traits`];
//! [`remote`] implements them on top of the HTTP clients.

pub mod catalog;
pub mod clock;
pub mod converter;
pub mod events;
pub mod pipeline;
pub mod remote;
pub mod report;
pub mod resolver;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use catalog::LanguageCatalog;
pub use clock::{SystemClock, TokioSleeper};
pub use converter::{ConversionState, FormatConverter};
pub use events::{EventBus, PipelineEvent};
pub use pipeline::{ResolutionMemo, UploadPipeline};
pub use report::{BatchReport, FileFailure};
pub use resolver::AssetResolver;
pub use traits::{CaptionService, Clock, ConversionService, LanguageSource, Sleeper, VideoSearch};
