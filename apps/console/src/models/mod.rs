pub mod analysis;
pub mod message;
pub mod session;
pub mod task;

pub use analysis::{CandidateAnalysis, MatchRating};
pub use message::{Message, Role, Source};
pub use session::Session;
pub use task::TaskType;
