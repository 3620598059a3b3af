use std::{
	fs::{
		self,
		OpenOptions,
	},
	path::PathBuf,
};

use blockdb_primitives::config::DatabasePath;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::cli::Opt;

/// File name used when no log file is given.
const DEFAULT_LOG_FILE: &str = "blockdb.log";

#[derive(Error, Debug)]
pub enum LoggingError {
	#[error("Cannot open log file `{0}`: `{1}`")]
	Open(PathBuf, std::io::Error),
	#[error("Invalid log filter `{0}`: `{1}`")]
	Filter(String, tracing_subscriber::filter::ParseError),
	#[error("Cannot install logger: `{0}`")]
	Install(String),
}

/// Where logs go, if anywhere.
///
/// The dashboard owns the terminal, so logs are only ever written to a file. An in-memory
/// database without an explicit `--log-file` does not log.
pub fn log_file(opt: &Opt, database: &DatabasePath) -> Option<PathBuf> {
	if let Some(path) = &opt.log_file {
		return Some(path.clone())
	}
	database.as_path().map(|path| path.with_file_name(DEFAULT_LOG_FILE))
}

/// Install the global subscriber. The returned guard flushes pending lines when dropped.
pub fn init(opt: &Opt, database: &DatabasePath) -> Result<Option<WorkerGuard>, LoggingError> {
	let path = match log_file(opt, database) {
		Some(path) => path,
		None => return Ok(None),
	};
	if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
		fs::create_dir_all(parent).map_err(|e| LoggingError::Open(path.clone(), e))?;
	}
	let file = OpenOptions::new()
		.create(true)
		.append(true)
		.open(&path)
		.map_err(|e| LoggingError::Open(path.clone(), e))?;

	let filter = match EnvFilter::try_from_default_env() {
		Ok(filter) => filter,
		Err(_) => EnvFilter::try_new(&opt.log_level)
			.map_err(|e| LoggingError::Filter(opt.log_level.clone(), e))?,
	};

	let (writer, guard) = tracing_appender::non_blocking(file);
	let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false);
	let installed =
		if opt.log_json { builder.json().try_init() } else { builder.try_init() };
	installed.map_err(|e| LoggingError::Install(e.to_string()))?;

	Ok(Some(guard))
}
