//! Shared helpers for tests that touch the repository-selection environment.

use std::sync::Mutex;

/// Variables read by `RepositoryType::from_env` and `PostgresConfig::from_env`.
const REPOSITORY_VARS: [&str; 3] = ["REPOSITORY_TYPE", "DATABASE_URL", "PG_DATABASE_URL"];

// Tests run in parallel threads; the environment is process-wide.
static REPOSITORY_ENV: Mutex<()> = Mutex::new(());

/// Restores the repository variables captured at construction, even on panic.
struct SavedRepositoryEnv {
    saved: Vec<(&'static str, Option<String>)>,
}

impl SavedRepositoryEnv {
    fn capture() -> Self {
        let saved = REPOSITORY_VARS
            .iter()
            .map(|&key| (key, std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for SavedRepositoryEnv {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}

/// Runs `f` with `REPOSITORY_TYPE` and `DATABASE_URL` set as given and
/// `PG_DATABASE_URL` cleared. `None` removes a variable.
pub fn with_repository_env<F, R>(
    repository_type: Option<&str>,
    database_url: Option<&str>,
    f: F,
) -> R
where
    F: FnOnce() -> R,
{
    let _lock = REPOSITORY_ENV
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = SavedRepositoryEnv::capture();

    let values = [repository_type, database_url, None];
    for (key, value) in REPOSITORY_VARS.iter().zip(values) {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
    f()
}
