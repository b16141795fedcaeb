//! Typed facade over the API endpoints used by the reports.
//!
//! Each operation issues exactly one GET with a fixed path and an ordered
//! query string, and returns the raw JSON body. Errors from the transport are
//! passed through untouched. Path segments taken from user input are
//! percent-encoded.

use crate::dates::{DateRange, YearMonth};
use crate::error::Result;
use crate::logging::LogConfig;
use crate::transport::Transport;
use log::log;
use serde_json::Value;
use urlencoding::encode;

/// API client facade for one authenticated user.
pub struct ApiClient<T: Transport> {
    transport: T,
    username: String,
    logging: LogConfig,
}

impl<T: Transport> ApiClient<T> {
    /// Creates a facade over `transport` acting as `username`.
    pub fn new(transport: T, username: impl Into<String>, logging: LogConfig) -> Self {
        ApiClient {
            transport,
            username: username.into(),
            logging,
        }
    }

    /// The user whose inventory is listed.
    pub fn username(&self) -> &str {
        &self.username
    }

    fn get(&self, path: String, query: Vec<(&str, String)>) -> Result<Value> {
        log!(self.logging.request_level, "GET {} {:?}", path, query);
        self.transport.get(&path, &query)
    }

    /// Raw inventory for the authenticated user.
    pub fn get_inventory(&self) -> Result<Value> {
        self.get(format!("/users/{}/inventory", encode(&self.username)), Vec::new())
    }

    pub fn get_org_billing_summary(&self, org: &str) -> Result<Value> {
        self.get(format!("/orgs/{}/billing-summary", encode(org)), Vec::new())
    }

    pub fn get_org_billing(&self, org: &str, period: YearMonth) -> Result<Value> {
        self.get(format!("/orgs/{}/billing", encode(org)), month_query(period))
    }

    pub fn get_org_billing_by_vdc(&self, org: &str) -> Result<Value> {
        self.get(format!("/orgs/{}/billing-by-vdc", encode(org)), Vec::new())
    }

    /// Historical billing between two dates, sent as epoch milliseconds.
    pub fn get_org_billing_historical(&self, org: &str, range: DateRange) -> Result<Value> {
        self.get(
            format!("/orgs/{}/historical-billing", encode(org)),
            range.millis_query(),
        )
    }

    pub fn get_org_billing_historical_by_vdc(&self, org: &str, range: DateRange) -> Result<Value> {
        self.get(
            format!("/orgs/{}/historical-billing-by-vdc", encode(org)),
            range.month_query(),
        )
    }

    /// O365 backup billing for one company location.
    pub fn get_o365_billing(&self, company: &str, location: &str, range: DateRange) -> Result<Value> {
        self.get(
            format!(
                "/companies/{}/location/{}/o365-billing",
                encode(company),
                encode(location)
            ),
            range.month_query(),
        )
    }

    pub fn get_vapp_billing(&self, vapp: &str, period: YearMonth) -> Result<Value> {
        self.get(format!("/vapps/{}/billing", encode(vapp)), month_query(period))
    }

    pub fn get_vdc_billing(&self, vdc: &str, period: YearMonth) -> Result<Value> {
        self.get(format!("/vdcs/{}/billing", encode(vdc)), month_query(period))
    }

    pub fn get_vm_billing(&self, vm: &str, period: YearMonth) -> Result<Value> {
        self.get(format!("/vms/{}/billing", encode(vm)), month_query(period))
    }

    pub fn get_vm_billing_summary(&self, vm: &str) -> Result<Value> {
        self.get(format!("/vms/{}/billing-summary", encode(vm)), Vec::new())
    }

    /// Current snapshot of a server-side task.
    pub fn get_task(&self, uuid: &str) -> Result<Value> {
        self.get(format!("/tasks/{}", encode(uuid)), Vec::new())
    }
}

fn month_query(period: YearMonth) -> Vec<(&'static str, String)> {
    vec![
        ("year", period.year.to_string()),
        ("month", period.month.to_string()),
    ]
}
