pub mod company;
pub mod config;
pub mod event;
pub mod feed;
pub mod verdict;

pub use company::{CompanyRecord, Location};
pub use config::Config;
pub use event::{EventClassification, EventType, NewsEvent, Tone, ToneVerdict};
pub use feed::FeedItem;
pub use verdict::{
    CandidateMatch, DisambiguationResult, DisambiguationSource, NameMatchType,
    NameSimilarityResult, VerificationVerdict,
};
