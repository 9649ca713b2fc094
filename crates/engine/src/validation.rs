//! Settings update requests and their validation

use serde::{Deserialize, Serialize};
use signoff_core::{ApprovalConfiguration, ApprovalMode, UserId};

use crate::error::{EngineError, EngineResult, ValidationIssue};
use crate::traits::UserDirectory;

/// Raw settings update as submitted by an administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    pub approval_mode: String,
    pub required_approvals: i64,
    #[serde(default)]
    pub required_user_id: Option<i64>,
}

impl SettingsRequest {
    pub fn new(approval_mode: impl Into<String>, required_approvals: i64) -> Self {
        Self {
            approval_mode: approval_mode.into(),
            required_approvals,
            required_user_id: None,
        }
    }

    pub fn with_leader(mut self, user_id: i64) -> Self {
        self.required_user_id = Some(user_id);
        self
    }
}

/// Check a request and turn it into a configuration.
///
/// Every issue is collected before failing, so the caller sees all of them
/// at once. Nothing is written here.
pub async fn validate(
    request: &SettingsRequest,
    directory: &dyn UserDirectory,
) -> EngineResult<ApprovalConfiguration> {
    let mut issues = Vec::new();

    let mode = match ApprovalMode::parse_name(&request.approval_mode) {
        Ok(mode) => Some(mode),
        Err(e) => {
            issues.push(ValidationIssue::new("approvalMode", "invalid", e.to_string()));
            None
        }
    };

    let required = match u32::try_from(request.required_approvals) {
        Ok(n) if n > 0 => Some(n),
        _ => {
            issues.push(ValidationIssue::new(
                "requiredApprovals",
                "not.greater.than.zero",
                format!(
                    "required approvals must be a positive number, got {}",
                    request.required_approvals
                ),
            ));
            None
        }
    };

    let leader = match (mode, request.required_user_id) {
        (Some(ApprovalMode::Leader), None) => {
            issues.push(ValidationIssue::new(
                "requiredUserId",
                "required",
                "LEADER mode needs a designated user",
            ));
            None
        }
        (Some(ApprovalMode::Leader), Some(id)) => {
            let id = UserId(id);
            match directory.find_user(id).await? {
                Some(user) if !user.username.trim().is_empty() => Some(id),
                Some(_) => {
                    issues.push(ValidationIssue::new(
                        "requiredUserId",
                        "blank.username",
                        format!("user {id} has no username"),
                    ));
                    None
                }
                None => {
                    issues.push(ValidationIssue::new(
                        "requiredUserId",
                        "not.found",
                        format!("user {id} does not exist"),
                    ));
                    None
                }
            }
        }
        // A leader id sent with another mode is ignored
        _ => None,
    };

    // A missing mode or count always left an issue behind
    match (mode, required) {
        (Some(approval_mode), Some(required_approvals)) if issues.is_empty() => {
            Ok(ApprovalConfiguration {
                approval_mode,
                required_approvals,
                required_user_id: leader,
            })
        }
        _ => Err(EngineError::Validation(issues)),
    }
}
