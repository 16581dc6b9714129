// Skill matching: variant expansion, job relevance, and emphasis highlighting.
// Pure and synchronous. Safe to call concurrently on independent inputs.

pub mod highlight;
pub mod patterns;
pub mod relevance;
pub mod variants;

pub use highlight::{highlight, highlight_with, strip_emphasis, EMPHASIS_CLOSE, EMPHASIS_OPEN};
pub use relevance::{is_relevant, JobMatcher};
pub use variants::variants;
