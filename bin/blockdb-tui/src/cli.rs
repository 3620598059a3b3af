use std::path::PathBuf;

use structopt::StructOpt;

/// Browse the blocks and transactions recorded during integration tests.
#[derive(StructOpt, Debug)]
#[structopt(name = "blockdb")]
pub struct Opt {
	/// Database file to open, or `:memory:`.
	#[structopt(env = "BLOCKDB_DATABASE_PATH")]
	pub database_path: String,

	/// Revision of the source tree, recorded when the schema is migrated.
	#[structopt(env = "BLOCKDB_SOURCE_REVISION")]
	pub source_revision: String,

	/// Write logs to this file. Defaults to `blockdb.log` beside the database.
	#[structopt(long, parse(from_os_str))]
	pub log_file: Option<PathBuf>,

	/// Log filter used when `RUST_LOG` is not set.
	#[structopt(long, default_value = "info")]
	pub log_level: String,

	/// Write logs as JSON lines.
	#[structopt(long)]
	pub log_json: bool,

	/// Number of test cases listed.
	#[structopt(long, default_value = "100")]
	pub limit: u32,
}
