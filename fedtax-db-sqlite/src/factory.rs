use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use fedtax_core::db::{DbConfig, RepositoryFactory};
use fedtax_core::{FilingRepository, RepositoryError};

use crate::repository::SqliteRepository;

/// Resolve the seeds directory at runtime so the backend works both from
/// the build tree and a packaged install.
///
/// Resolution order:
/// 1. `FEDTAX_SQLITE_SEEDS_DIR`, if set.
/// 2. `./seeds`, if the directory exists in the working directory.
/// 3. `$CARGO_MANIFEST_DIR/seeds` (dev/tests run from the build tree).
fn seeds_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FEDTAX_SQLITE_SEEDS_DIR") {
        return PathBuf::from(dir);
    }
    let cwd_seeds = PathBuf::from("./seeds");
    if cwd_seeds.is_dir() {
        return cwd_seeds;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
}

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`fedtax_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use fedtax_core::db::RepositoryRegistry;
/// use fedtax_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens the database named by `config.connection_string` (a file path
    /// or `":memory:"`), runs migrations, and executes the seed SQL found
    /// via [`seeds_dir`].
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn FilingRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let seeds = seeds_dir();
        info!(seeds = %seeds.display(), "seeding sqlite repository");
        repo.run_seeds(&seeds)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(Box::new(repo))
    }
}

#[cfg(test)]
mod tests {
    use fedtax_core::FilingRepository;
    use fedtax_core::db::{DbConfig, RepositoryFactory};

    use super::SqliteRepositoryFactory;

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteRepositoryFactory.backend_name(), "sqlite");
    }

    /// Full round-trip: factory → repository over an in-memory database,
    /// migrations and seeds included.
    #[tokio::test]
    async fn creates_seeded_in_memory_repository() {
        let config = DbConfig {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        };

        let repo = SqliteRepositoryFactory
            .create(&config)
            .await
            .expect("factory should produce a working repository");

        let years = repo.list_tax_years().await.expect("seeded years expected");
        assert_eq!(years, vec![2025]);
    }
}
