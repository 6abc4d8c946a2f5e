//! SQLite storage: connection pool, migrations, scan history and sessions.

mod circuit_breaker;
mod history;
mod identity;
mod migrations;
mod pool;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use circuit_breaker::{BreakerState, HistoryWriteBreaker};
pub use history::{HistoryStore, SqliteHistoryStore};
pub use identity::{session_token, IdentityProvider, SessionIdentityProvider};
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
