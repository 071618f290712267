pub mod review;
pub mod roles;

pub use review::{
    AccessContext, AuthzError, ReturnAction, ReturnStatus, apply_action, is_action_allowed,
    transition,
};
pub use roles::{Permission, Role};
