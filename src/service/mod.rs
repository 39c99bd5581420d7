pub mod delivery;
pub mod disambiguation;
pub mod event;
pub mod lexicon;
pub mod matcher;
pub mod pipeline;
pub mod registry;
pub mod tone;
pub mod verify;

pub use delivery::SlackDelivery;
pub use event::EventClassifier;
pub use lexicon::Lexicons;
pub use matcher::NameMatcher;
pub use pipeline::{PipelineService, ScanSummary};
pub use tone::ToneAnalyzer;
pub use verify::MentionVerifier;
