//! Job state definitions for tracking crawl progress
//!
//! A job moves `Pending → Fetching → Expanding | Probed → Done`, or from
//! `Fetching` to `Failed`.

use crate::CrawlerError;
use std::fmt;

/// Represents the current state of a job in a tree walker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    // ===== Active States =====
    /// Job is queued and waiting for a worker slot
    Pending,

    /// Job holds a worker slot and its request is in flight
    Fetching,

    /// Directory listing was fetched and its children are being enqueued
    Expanding,

    /// File metadata was fetched
    Probed,

    // ===== Terminal States =====
    /// Job finished successfully
    Done,

    /// Job finished with a transport or status error
    Failed,
}

impl JobState {
    /// Returns true if no further processing happens for the job
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Checks whether moving to `next` is a legal transition
    pub fn can_transition_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::Expanding)
                | (Self::Fetching, Self::Probed)
                | (Self::Fetching, Self::Failed)
                | (Self::Expanding, Self::Done)
                | (Self::Probed, Self::Done)
        )
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn transition(self, next: JobState) -> Result<JobState, CrawlerError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CrawlerError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Expanding => "expanding",
            Self::Probed => "probed",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
