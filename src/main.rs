//! ilandinfo CLI
//!
//! Collects information about an iland cloud environment using the iland
//! cloud API.
//!
//! # Usage
//!
//! ```bash
//! ilandinfo -c creds.json inventory vm
//! ilandinfo billing org --uuid <org-uuid> --date 2021-11-05
//! ilandinfo billing o365 --company <id> --location <id>
//! ilandinfo task <task-uuid>
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: overrides the `-v` verbosity (e.g. `debug`, `ilandinfo=trace`)
//! - `ILAND_API_URL`, `ILAND_TOKEN_URL`: override the API and token endpoints

use clap::Parser;
use ilandinfo::cli::{self, Args};
use ilandinfo::LogConfig;
use std::process;

fn main() {
    let args = Args::parse();
    let logging = LogConfig::from_verbosity(args.verbose);
    logging.init();

    if let Err(e) = cli::run(args, logging) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
