//! Command-line arguments and command dispatch.
//!
//! Billing options are validated into a [`BillingRequest`] before credentials
//! are read, so bad input never reaches the network.

use crate::client::ApiClient;
use crate::credentials::Credentials;
use crate::dates::{self, DateRange, YearMonth, DEFAULT_RANGE_MONTHS};
use crate::error::{Error, Result};
use crate::inventory::{self, EntityCategory, Inventory};
use crate::logging::LogConfig;
use crate::report::Report;
use crate::task::TaskWatcher;
use crate::transport::{Endpoints, HttpTransport, Transport, DEFAULT_API_URL, DEFAULT_TOKEN_URL};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::info;
use serde_json::{Map, Value};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Collect information about your iland cloud environment using the iland cloud API
#[derive(Parser, Debug)]
#[command(name = "ilandinfo", author, version, about, long_about = None)]
pub struct Args {
    /// Credentials file (JSON format)
    #[arg(short = 'c', long, global = true, default_value = "creds.json")]
    pub credentials_file: PathBuf,

    /// Base URL of the iland cloud API
    #[arg(long, global = true, env = "ILAND_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// OAuth2 token endpoint
    #[arg(long, global = true, env = "ILAND_TOKEN_URL", default_value = DEFAULT_TOKEN_URL)]
    pub token_url: String,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List inventory objects as `name, uuid` rows
    Inventory {
        /// Object type: company, location, org, vdc, vapp, vm, o365-org, backup, ...
        object: String,
    },
    /// Print a billing report as JSON
    Billing {
        /// Billing report to fetch
        #[arg(value_enum)]
        service: BillingService,

        #[command(flatten)]
        options: BillingOptions,
    },
    /// Follow a server-side task until it finishes
    Task {
        /// Task UUID
        uuid: String,
    },
}

/// Billing reports that can be requested.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingService {
    Org,
    OrgByVdc,
    OrgSummary,
    OrgHistorical,
    OrgHistoricalByVdc,
    Vapp,
    Vdc,
    Vm,
    VmSummary,
    O365,
}

impl BillingService {
    pub fn name(self) -> &'static str {
        match self {
            BillingService::Org => "org",
            BillingService::OrgByVdc => "org-by-vdc",
            BillingService::OrgSummary => "org-summary",
            BillingService::OrgHistorical => "org-historical",
            BillingService::OrgHistoricalByVdc => "org-historical-by-vdc",
            BillingService::Vapp => "vapp",
            BillingService::Vdc => "vdc",
            BillingService::Vm => "vm",
            BillingService::VmSummary => "vm-summary",
            BillingService::O365 => "o365",
        }
    }

    /// Options that must be present for this service.
    pub fn required_options(self) -> &'static [&'static str] {
        match self {
            BillingService::Org
            | BillingService::OrgByVdc
            | BillingService::OrgSummary
            | BillingService::Vapp
            | BillingService::Vdc
            | BillingService::Vm
            | BillingService::VmSummary => &["uuid"],
            BillingService::OrgHistorical | BillingService::OrgHistoricalByVdc => {
                &["start", "end"]
            }
            BillingService::O365 => &["company", "location"],
        }
    }
}

/// Options shared by every billing service.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BillingOptions {
    /// UUID of the org, vApp, VDC or VM
    #[arg(long)]
    pub uuid: Option<String>,

    /// Billing month, any day in it (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Company ID (o365)
    #[arg(long)]
    pub company: Option<String>,

    /// Location ID (o365)
    #[arg(long)]
    pub location: Option<String>,
}

impl BillingOptions {
    fn value(&self, option: &str) -> Option<&str> {
        let value = match option {
            "uuid" => &self.uuid,
            "date" => &self.date,
            "start" => &self.start,
            "end" => &self.end,
            "company" => &self.company,
            "location" => &self.location,
            _ => return None,
        };
        value.as_deref()
    }
}

/// A validated billing call, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingRequest {
    Org { org: String, period: YearMonth },
    OrgByVdc { org: String },
    OrgSummary { org: String },
    /// `org: None` reports on every org in the inventory.
    OrgHistorical { org: Option<String>, range: DateRange },
    OrgHistoricalByVdc { org: Option<String>, range: DateRange },
    Vapp { vapp: String, period: YearMonth },
    Vdc { vdc: String, period: YearMonth },
    Vm { vm: String, period: YearMonth },
    VmSummary { vm: String },
    O365 { company: String, location: String, range: DateRange },
}

impl BillingRequest {
    /// Checks required options and parses dates for `service`.
    ///
    /// Every date option given is validated, even ones `service` ignores.
    /// `today` fills in a missing `--date` and the default o365 range.
    pub fn from_options(
        service: BillingService,
        options: &BillingOptions,
        today: NaiveDate,
    ) -> Result<Self> {
        let missing: Vec<String> = service
            .required_options()
            .iter()
            .filter(|option| options.value(option).is_none())
            .map(|option| format!("--{}", option))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Argument(format!(
                "billing {}: missing required option(s): {}",
                service.name(),
                missing.join(", ")
            )));
        }

        let date_options = [
            ("date", &options.date),
            ("start", &options.start),
            ("end", &options.end),
        ];
        for (option, value) in date_options {
            if let Some(text) = value {
                dates::parse_date(text).map_err(|e| {
                    Error::Argument(format!("billing {}: --{}: {}", service.name(), option, e))
                })?;
            }
        }

        let uuid = || options.uuid.clone().unwrap_or_default();
        let period = || -> Result<YearMonth> {
            let date = match &options.date {
                Some(text) => dates::parse_date(text)?,
                None => today,
            };
            Ok(YearMonth::from(date))
        };

        let request = match service {
            BillingService::Org => BillingRequest::Org {
                org: uuid(),
                period: period()?,
            },
            BillingService::OrgByVdc => BillingRequest::OrgByVdc { org: uuid() },
            BillingService::OrgSummary => BillingRequest::OrgSummary { org: uuid() },
            BillingService::OrgHistorical => BillingRequest::OrgHistorical {
                org: options.uuid.clone(),
                range: explicit_range(options)?,
            },
            BillingService::OrgHistoricalByVdc => BillingRequest::OrgHistoricalByVdc {
                org: options.uuid.clone(),
                range: explicit_range(options)?,
            },
            BillingService::Vapp => BillingRequest::Vapp {
                vapp: uuid(),
                period: period()?,
            },
            BillingService::Vdc => BillingRequest::Vdc {
                vdc: uuid(),
                period: period()?,
            },
            BillingService::Vm => BillingRequest::Vm {
                vm: uuid(),
                period: period()?,
            },
            BillingService::VmSummary => BillingRequest::VmSummary { vm: uuid() },
            BillingService::O365 => BillingRequest::O365 {
                company: options.company.clone().unwrap_or_default(),
                location: options.location.clone().unwrap_or_default(),
                range: default_range(options, today)?,
            },
        };

        Ok(request)
    }
}

/// Range from `--start`/`--end`, both already known to be present.
fn explicit_range(options: &BillingOptions) -> Result<DateRange> {
    let start = dates::parse_date(options.start.as_deref().unwrap_or_default())?;
    let end = dates::parse_date(options.end.as_deref().unwrap_or_default())?;
    DateRange::new(start, end)
}

/// Range from optional `--start`/`--end`; a missing end is today and a
/// missing start lies six calendar months before the end.
fn default_range(options: &BillingOptions, today: NaiveDate) -> Result<DateRange> {
    let end = match &options.end {
        Some(text) => dates::parse_date(text)?,
        None => today,
    };
    match &options.start {
        Some(text) => DateRange::new(dates::parse_date(text)?, end),
        None => Ok(DateRange::trailing_months(end, DEFAULT_RANGE_MONTHS)),
    }
}

/// Lists one inventory category as CSV.
pub fn run_inventory<T: Transport, W: Write>(
    client: &ApiClient<T>,
    category: EntityCategory,
    out: W,
) -> Result<()> {
    let inventory = Inventory::from_json(&client.get_inventory()?)?;
    let records = inventory.entities(category);
    info!(
        "{} {} record(s) for company {} ({})",
        records.len(),
        category,
        inventory.company_name,
        inventory.company_id
    );
    inventory::write_csv(records, out)
}

/// Issues the billing call(s) for `request` and shapes the result.
pub fn run_billing<T: Transport>(client: &ApiClient<T>, request: &BillingRequest) -> Result<Report> {
    let raw = match request {
        BillingRequest::Org { org, period } => client.get_org_billing(org, *period)?,
        BillingRequest::OrgByVdc { org } => client.get_org_billing_by_vdc(org)?,
        BillingRequest::OrgSummary { org } => client.get_org_billing_summary(org)?,
        BillingRequest::OrgHistorical { org, range } => per_org(client, org.as_deref(), |org| {
            client.get_org_billing_historical(org, *range)
        })?,
        BillingRequest::OrgHistoricalByVdc { org, range } => {
            per_org(client, org.as_deref(), |org| {
                client.get_org_billing_historical_by_vdc(org, *range)
            })?
        }
        BillingRequest::Vapp { vapp, period } => client.get_vapp_billing(vapp, *period)?,
        BillingRequest::Vdc { vdc, period } => client.get_vdc_billing(vdc, *period)?,
        BillingRequest::Vm { vm, period } => client.get_vm_billing(vm, *period)?,
        BillingRequest::VmSummary { vm } => client.get_vm_billing_summary(vm)?,
        BillingRequest::O365 {
            company,
            location,
            range,
        } => client.get_o365_billing(company, location, *range)?,
    };
    Ok(Report::from_json(raw))
}

/// Runs `fetch` for one org, or for every org in the inventory keyed by
/// org UUID when none is given.
fn per_org<T, F>(client: &ApiClient<T>, org: Option<&str>, fetch: F) -> Result<Value>
where
    T: Transport,
    F: Fn(&str) -> Result<Value>,
{
    if let Some(org) = org {
        return fetch(org);
    }

    let inventory = Inventory::from_json(&client.get_inventory()?)?;
    let mut reports = Map::new();
    for record in inventory.entities(EntityCategory::Org) {
        let uuid = record
            .get("uuid")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Schema("org record has no 'uuid'".into()))?;
        let report = Report::from_json(fetch(uuid)?);
        reports.insert(uuid.to_string(), report.body);
    }
    Ok(Value::Object(reports))
}

fn connect(
    credentials_file: &Path,
    endpoints: &Endpoints,
    logging: LogConfig,
) -> Result<ApiClient<HttpTransport>> {
    let credentials = Credentials::load(credentials_file)?;
    let transport = HttpTransport::connect(&credentials, endpoints)?;
    Ok(ApiClient::new(transport, credentials.username, logging))
}

/// Runs one CLI invocation, writing results to stdout.
pub fn run(args: Args, logging: LogConfig) -> Result<()> {
    let Args {
        credentials_file,
        api_url,
        token_url,
        command,
        ..
    } = args;
    let endpoints = Endpoints { api_url, token_url };
    let stdout = io::stdout();

    match command {
        Command::Inventory { object } => {
            let category: EntityCategory = object.parse()?;
            let client = connect(&credentials_file, &endpoints, logging)?;
            run_inventory(&client, category, stdout.lock())
        }
        Command::Billing { service, options } => {
            let request = BillingRequest::from_options(service, &options, dates::today())?;
            let client = connect(&credentials_file, &endpoints, logging)?;
            run_billing(&client, &request)?.write_to(stdout.lock())
        }
        Command::Task { uuid } => {
            let client = connect(&credentials_file, &endpoints, logging)?;
            TaskWatcher::default().watch(&client, &uuid, stdout.lock())?;
            Ok(())
        }
    }
}
