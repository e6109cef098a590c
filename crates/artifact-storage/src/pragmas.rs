//! PRAGMA setup for caller-owned connections.
//!
//! The engine never opens connections itself; callers that want the
//! configured journal mode and busy timeout call this right after opening.

use rusqlite::Connection;
use tracing::debug;

use artifact_core::config::StoreConfig;
use artifact_core::errors::StorageResult;

/// Apply journal mode, synchronous level, foreign keys, busy timeout and
/// cache size from `config`. Invalid keyword settings fail before any
/// PRAGMA runs.
pub fn configure_connection(conn: &Connection, config: &StoreConfig) -> StorageResult<()> {
    let batch = config.pragma_batch()?;
    conn.execute_batch(&batch)?;
    debug!(
        journal_mode = %config.journal_mode,
        synchronous = %config.synchronous,
        busy_timeout_ms = config.busy_timeout_ms,
        "connection configured"
    );
    Ok(())
}
