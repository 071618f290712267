//! Review-workflow authorization: a fixed decision table over
//! `(action, status, role, ownership/assignment flags)`.
//!
//! This is table-driven dispatch, not an event-driven state machine. A
//! return's status only changes when a caller explicitly applies a
//! status-changing action via [`apply_action`]; nothing progresses on its
//! own.
//!
//! The lifecycle: `Draft → InReview → Approved → Filed`, with `Revert`
//! walking one step back from `InReview` or `Approved`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::roles::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnStatus {
    Draft,
    InReview,
    Approved,
    Filed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnAction {
    Edit,
    Submit,
    Approve,
    Revert,
    View,
}

/// The caller's relationship to the return being acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessContext {
    /// The return belongs to the caller (the taxpayer).
    pub is_owner: bool,
    /// The return is assigned to the caller (preparer or reviewer).
    pub is_assigned: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthzError {
    #[error("{role:?} may not {action:?} a return in {status:?}")]
    NotPermitted {
        role: Role,
        action: ReturnAction,
        status: ReturnStatus,
    },

    #[error("{action:?} does not change status from {status:?}")]
    NoTransition {
        action: ReturnAction,
        status: ReturnStatus,
    },
}

/// The decision table: whether `role` may perform `action` on a return in
/// `status` given its relationship to the return.
///
/// Admins pass every row except editing outside `Draft`: a filed or
/// in-review return is immutable for everyone until reverted.
pub fn is_action_allowed(
    action: ReturnAction,
    status: ReturnStatus,
    role: Role,
    ctx: AccessContext,
) -> bool {
    use ReturnAction::*;
    use ReturnStatus::*;
    use Role::*;

    match (action, status, role) {
        // Viewing: admins always; staff when assigned; clients their own.
        (View, _, Admin) => true,
        (View, _, Preparer | Reviewer) => ctx.is_assigned,
        (View, _, Client) => ctx.is_owner,

        // Editing: drafts only, by the owner, the assigned preparer, or an
        // admin.
        (Edit, Draft, Admin) => true,
        (Edit, Draft, Preparer) => ctx.is_assigned,
        (Edit, Draft, Client) => ctx.is_owner,
        (Edit, _, _) => false,

        // Submitting a draft for review: same parties that can edit it.
        (Submit, Draft, Admin) => true,
        (Submit, Draft, Preparer) => ctx.is_assigned,
        (Submit, Draft, Client) => ctx.is_owner,

        // Filing an approved return: staff only, never the client.
        (Submit, Approved, Admin) => true,
        (Submit, Approved, Preparer) => ctx.is_assigned,
        (Submit, _, _) => false,

        // Approving: the assigned reviewer or an admin, from review only.
        (Approve, InReview, Admin) => true,
        (Approve, InReview, Reviewer) => ctx.is_assigned,
        (Approve, _, _) => false,

        // Reverting: one step back, by the assigned reviewer or an admin.
        (Revert, InReview | Approved, Admin) => true,
        (Revert, InReview | Approved, Reviewer) => ctx.is_assigned,
        (Revert, _, _) => false,
    }
}

/// Status produced by a status-changing action, or `None` for actions that
/// leave the status alone (or do not apply in `status`).
pub fn transition(status: ReturnStatus, action: ReturnAction) -> Option<ReturnStatus> {
    use ReturnAction::*;
    use ReturnStatus::*;

    match (status, action) {
        (Draft, Submit) => Some(InReview),
        (InReview, Approve) => Some(Approved),
        (InReview, Revert) => Some(Draft),
        (Approved, Submit) => Some(Filed),
        (Approved, Revert) => Some(InReview),
        _ => None,
    }
}

/// Checks the decision table, then applies the transition. The only way a
/// status changes.
pub fn apply_action(
    status: ReturnStatus,
    action: ReturnAction,
    role: Role,
    ctx: AccessContext,
) -> Result<ReturnStatus, AuthzError> {
    if !is_action_allowed(action, status, role, ctx) {
        return Err(AuthzError::NotPermitted {
            role,
            action,
            status,
        });
    }
    transition(status, action).ok_or(AuthzError::NoTransition { action, status })
}
