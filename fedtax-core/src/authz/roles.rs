//! Platform roles and their statically configured permission sets.
//!
//! Pure lookup: a role maps to a fixed permission slice. There is no
//! runtime permission assignment; changing a role's capabilities is a code
//! change, reviewed like any other.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Firm administrator: full access, including user management.
    Admin,
    /// Prepares returns assigned to them.
    Preparer,
    /// Reviews and approves prepared returns.
    Reviewer,
    /// The taxpayer; sees and edits only their own return.
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    ViewOwnReturn,
    ViewAssignedReturns,
    ViewAllReturns,
    EditReturns,
    ApproveReturns,
    SubmitReturns,
    ManageUsers,
}

impl Role {
    /// The role's statically configured permission set.
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Admin => &[
                Permission::ViewAllReturns,
                Permission::EditReturns,
                Permission::ApproveReturns,
                Permission::SubmitReturns,
                Permission::ManageUsers,
            ],
            Role::Preparer => &[
                Permission::ViewAssignedReturns,
                Permission::EditReturns,
                Permission::SubmitReturns,
            ],
            Role::Reviewer => &[
                Permission::ViewAssignedReturns,
                Permission::ApproveReturns,
            ],
            Role::Client => &[
                Permission::ViewOwnReturn,
                Permission::EditReturns,
                Permission::SubmitReturns,
            ],
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}
