pub mod domain;
pub mod generation;
pub mod parse;
pub mod ports;
pub mod prompts;
pub mod session;

pub use domain::{ContentType, GenerationOutcome, HistoryEntry, UserRecord, UserRole};
pub use generation::{GenerationPolicy, ResearchGenerator};
pub use ports::{
    CredentialStore, GenerationClient, GenerationError, PortError, PortResult, ResearchArchive,
    DEFAULT_HISTORY_LIMIT,
};
pub use session::{DispatchReply, Notice, SessionAction, SessionState, TopicStage};
