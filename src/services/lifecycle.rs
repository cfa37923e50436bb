//! Maintenance request workflow rules

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::enums::RequestStatus,
};

/// Decides which status changes a request may go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any status may follow any other (kanban drag-and-drop semantics)
    #[default]
    Permissive,
    /// NEW → IN_PROGRESS | SCRAP, IN_PROGRESS → NEW | REPAIRED | SCRAP;
    /// REPAIRED and SCRAP are terminal
    Strict,
}

impl TransitionPolicy {
    /// Whether a request in `from` may move to `to`
    pub fn allows(self, from: RequestStatus, to: RequestStatus) -> bool {
        use RequestStatus::*;

        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Strict => {
                from == to
                    || matches!(
                        (from, to),
                        (New, InProgress)
                            | (New, Scrap)
                            | (InProgress, New)
                            | (InProgress, Repaired)
                            | (InProgress, Scrap)
                    )
            }
        }
    }

    /// Same as [`allows`](Self::allows) but returns a business-rule error on refusal
    pub fn check(self, request_id: i32, from: RequestStatus, to: RequestStatus) -> AppResult<()> {
        if self.allows(from, to) {
            Ok(())
        } else {
            tracing::warn!("Refused transition {} -> {} for request {}", from, to, request_id);
            Err(AppError::BusinessRule(format!(
                "Request {} cannot move from {} to {}",
                request_id, from, to
            )))
        }
    }
}
