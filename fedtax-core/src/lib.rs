pub mod authz;
pub mod calculations;
pub mod db;
pub mod models;

pub use db::repository::{FilingRepository, RepositoryError};
pub use models::*;
