//! # ilandinfo
//!
//! A reporting client for the iland cloud API: lists inventory objects and
//! prints billing reports.
//!
//! ## Design Principles
//!
//! - **Validate before connecting**: billing options and dates are checked
//!   before credentials are read or any request is sent
//! - **One request per report**: no retries, paging or caching
//! - **Deterministic output**: inventory rows keep server order, report keys
//!   are sorted
//!
//! ## Example
//!
//! ```no_run
//! use ilandinfo::{ApiClient, Credentials, Endpoints, HttpTransport, LogConfig, Report};
//!
//! let credentials = Credentials::load("creds.json").unwrap();
//! let transport = HttpTransport::connect(&credentials, &Endpoints::default()).unwrap();
//! let client = ApiClient::new(transport, credentials.username.clone(), LogConfig::default());
//! let report = Report::from_json(client.get_org_billing_summary("org-uuid").unwrap());
//! report.write_to(std::io::stdout()).unwrap();
//! ```

pub mod cli;
pub mod client;
pub mod credentials;
pub mod dates;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod report;
pub mod task;
pub mod transport;

pub use client::ApiClient;
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use inventory::{entities_of, EntityCategory, Inventory};
pub use logging::LogConfig;
pub use report::Report;
pub use task::{Task, TaskWatcher};
pub use transport::{Endpoints, HttpTransport, Transport};
