use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::ApiError;
use super::image::GenerationResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollStatusRequest {
    pub request_id: String,
}

impl PollStatusRequest {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl PollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollStatus::Pending => "pending",
            PollStatus::Processing => "processing",
            PollStatus::Completed => "completed",
            PollStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized answer to a status poll.
#[derive(Debug, Clone)]
pub enum PollStatusResponse {
    Pending {
        estimated_time_remaining: Option<f64>,
    },
    Processing {
        /// 0-100, when the backend reports it.
        progress: Option<f64>,
        /// Seconds.
        estimated_time_remaining: Option<f64>,
    },
    Completed(GenerationResult),
    Failed(ApiError),
}

impl PollStatusResponse {
    pub fn status(&self) -> PollStatus {
        match self {
            PollStatusResponse::Pending { .. } => PollStatus::Pending,
            PollStatusResponse::Processing { .. } => PollStatus::Processing,
            PollStatusResponse::Completed(_) => PollStatus::Completed,
            PollStatusResponse::Failed(_) => PollStatus::Failed,
        }
    }

    pub fn progress(&self) -> Option<f64> {
        match self {
            PollStatusResponse::Processing { progress, .. } => *progress,
            _ => None,
        }
    }

    pub fn estimated_time_remaining(&self) -> Option<f64> {
        match self {
            PollStatusResponse::Pending {
                estimated_time_remaining,
            }
            | PollStatusResponse::Processing {
                estimated_time_remaining,
                ..
            } => *estimated_time_remaining,
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        match self {
            PollStatusResponse::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            PollStatusResponse::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// True once polling again cannot change the answer.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollStatusResponse::Completed(_) | PollStatusResponse::Failed(_)
        )
    }
}
