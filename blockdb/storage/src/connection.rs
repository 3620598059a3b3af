use std::{
	fs,
	path::Path,
	time::Duration,
};

use blockdb_primitives::config::DatabasePath;
use rusqlite::Connection;
use tracing::debug;

use crate::errors::{
	Result,
	ResultExt,
};

/// How long a writer waits on a locked database before giving up.
pub const BUSY_TIMEOUT: Duration = Duration::from_millis(4000);

/// Open the database, configure it, and check it answers.
pub(crate) fn open(path: &DatabasePath) -> Result<Connection> {
	let conn = match path {
		DatabasePath::Memory => Connection::open_in_memory().context("open in-memory database")?,
		DatabasePath::File(file) => {
			ensure_parent_dir(file).context("create database directory")?;
			Connection::open(file).context("open database")?
		},
	};
	apply_pragmas(&conn)?;
	ping(&conn)?;
	debug!(message = "Database connected", path = %path);
	Ok(conn)
}

/// Session pragmas. Safe to re-assert on a connection that already has them.
pub(crate) fn apply_pragmas(conn: &Connection) -> Result<()> {
	conn.busy_timeout(BUSY_TIMEOUT).context("set busy timeout")?;
	// journal_mode answers with the resulting mode; in-memory databases stay in "memory".
	let _mode: String = conn
		.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))
		.context("set journal mode")?;
	conn.execute_batch("PRAGMA foreign_keys=ON;").context("enable foreign keys")?;
	Ok(())
}

/// Round trip a trivial statement.
pub(crate) fn ping(conn: &Connection) -> Result<()> {
	let _: i64 = conn.query_row("SELECT 1", [], |row| row.get(0)).context("ping")?;
	Ok(())
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
	let parent = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => return Ok(()),
	};
	if parent.is_dir() {
		return Ok(())
	}
	create_private_dir(parent)
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
	use std::os::unix::fs::DirBuilderExt;
	fs::DirBuilder::new().recursive(true).mode(0o700).create(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
	fs::create_dir_all(path)
}
