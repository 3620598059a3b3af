use std::{
	fmt::Display,
	process,
};

use blockdb_primitives::{
	config::Config,
	context::Context,
};
use blockdb_storage::BlockDB;
use structopt::StructOpt;
use tracing::{
	error,
	info,
};

use crate::{
	cli::Opt,
	tui::{
		screens::TestCasesScreen,
		App,
		Loader,
	},
};

mod cli;
mod logging;
#[cfg(test)]
mod tests;
mod tui;

/// Exit code for errors before the dashboard starts.
const EXIT_FATAL: i32 = 1;

fn main() {
	let opt = Opt::from_args();
	process::exit(run(opt));
}

fn run(opt: Opt) -> i32 {
	let config = Config::new(opt.database_path.clone(), opt.source_revision.clone());
	let path = match config.validate() {
		Ok(path) => path,
		Err(e) => return fatal("invalid configuration", e),
	};

	// Held until `run` returns so buffered log lines are flushed.
	let _log_guard = match logging::init(&opt, &path) {
		Ok(guard) => guard,
		Err(e) => return fatal("logging failed", e),
	};

	let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
		Ok(runtime) => runtime,
		Err(e) => return fatal("runtime failed", e),
	};

	info!(message = "Opening database", path = %path);
	let db = match BlockDB::connect(path) {
		Ok(db) => db,
		Err(e) => return fatal("connect failed", e),
	};
	if let Err(e) = runtime.block_on(db.migrate(&Context::background(), &config.source_revision)) {
		return fatal("migrate failed", e)
	}

	let loader = Loader::new(db, runtime.handle().clone(), opt.limit);
	let test_cases = match loader.test_cases() {
		Ok(rows) if rows.is_empty() => return fatal("no test cases found", "database is empty"),
		Ok(rows) => rows,
		Err(e) => return fatal("no test cases found", e),
	};

	let app = App::new(loader, Box::new(TestCasesScreen::new(test_cases)));
	match tui::run(app) {
		Ok(code) => {
			info!(message = "Dashboard closed", code = code);
			code
		},
		Err(e) => fatal("terminal failed", e),
	}
}

fn fatal(context: &str, e: impl Display) -> i32 {
	error!(message = "Fatal error", context = context, error = %e);
	eprintln!("{}: {}", context, e);
	EXIT_FATAL
}
