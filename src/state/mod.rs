//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `JobState`: lifecycle of a single job inside a tree walker
//! - `StatusClass`: coarse classification of HTTP status codes driving failure handling

mod job_state;
mod status;

// Re-export main types
pub use job_state::JobState;
pub use status::{check_status, StatusClass};
