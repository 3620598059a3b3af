#![warn(clippy::missing_docs_in_private_items)]

/// Create schema version table SQL.
pub(super) const DB_CREATE_SCHEMA_VERSION: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL CHECK (length(created_at) > 0),
    git_sha TEXT NOT NULL CHECK (length(git_sha) > 0)
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_schema_version_git_sha ON schema_version(git_sha);
";

/// Record the revision that last migrated the schema.
pub(super) const DB_UPSERT_SCHEMA_VERSION: &str = "
INSERT INTO schema_version(created_at, git_sha) VALUES (?1, ?2)
ON CONFLICT(git_sha) DO NOTHING
";

/// Create test case table SQL.
pub(super) const DB_CREATE_TEST_CASE: &str = "
CREATE TABLE IF NOT EXISTS test_case (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(name) > 0),
    git_sha TEXT NOT NULL CHECK (length(git_sha) > 0),
    created_at TEXT NOT NULL CHECK (length(created_at) > 0)
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_test_case_name_created_at ON test_case(name, created_at);
";

/// Create chain table SQL. `chain_type` is added by `DB_EVOLVE_COLUMNS`.
pub(super) const DB_CREATE_CHAIN: &str = "
CREATE TABLE IF NOT EXISTS chain (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    chain_id TEXT NOT NULL CHECK (length(chain_id) > 0),
    fk_test_id INTEGER,
    FOREIGN KEY(fk_test_id) REFERENCES test_case(id) ON DELETE CASCADE
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_chain_chain_id_test_id ON chain(chain_id, fk_test_id);
";

/// Create block table SQL.
pub(super) const DB_CREATE_BLOCK: &str = "
CREATE TABLE IF NOT EXISTS block (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    height INTEGER NOT NULL CHECK (height >= 0),
    fk_chain_id INTEGER,
    created_at TEXT NOT NULL CHECK (length(created_at) > 0),
    FOREIGN KEY(fk_chain_id) REFERENCES chain(id) ON DELETE CASCADE
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_block_height_chain_id ON block(height, fk_chain_id);
";

/// Create tx table SQL.
pub(super) const DB_CREATE_TX: &str = "
CREATE TABLE IF NOT EXISTS tx (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    data TEXT NOT NULL CHECK (length(data) > 0),
    fk_block_id INTEGER,
    FOREIGN KEY(fk_block_id) REFERENCES block(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_tx_block_id ON tx(fk_block_id);
";

/// Create tendermint event tables SQL.
pub(super) const DB_CREATE_TENDERMINT_EVENT: &str = "
CREATE TABLE IF NOT EXISTS tendermint_event (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL CHECK (length(type) > 0),
    fk_tx_id INTEGER,
    FOREIGN KEY(fk_tx_id) REFERENCES tx(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_tendermint_event_tx_id ON tendermint_event(fk_tx_id);

CREATE TABLE IF NOT EXISTS tendermint_event_attr (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    key TEXT NOT NULL,
    value TEXT,
    fk_event_id INTEGER,
    FOREIGN KEY(fk_event_id) REFERENCES tendermint_event(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_tendermint_event_attr_event_id ON tendermint_event_attr(fk_event_id);
";

/// Columns added to tables created by earlier revisions.
pub(super) const DB_EVOLVE_COLUMNS: &[&str] =
	&["ALTER TABLE chain ADD COLUMN chain_type TEXT NOT NULL DEFAULT 'unknown'"];

/// Insert or refresh a block row.
pub(super) const DB_UPSERT_BLOCK: &str = "
INSERT INTO block(height, fk_chain_id, created_at) VALUES (?1, ?2, ?3)
ON CONFLICT(height, fk_chain_id) DO UPDATE SET created_at = excluded.created_at
";
