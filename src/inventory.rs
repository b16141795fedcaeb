//! Inventory model and the CLI-token to API-category table.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Inventory entity categories that can be listed.
///
/// Each variant has a fixed CLI token and API category key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    Catalog,
    Company,
    Edge,
    Location,
    Media,
    Network,
    O365Job,
    O365Location,
    O365Org,
    O365Restore,
    Org,
    Template,
    Vdc,
    Vapp,
    VappNetwork,
    VccLocation,
    VccTenant,
    Vpg,
    Vm,
}

/// `backup` is accepted as an alias for the VCC backup tenant category.
const BACKUP_ALIAS: &str = "backup";

impl EntityCategory {
    pub const ALL: [EntityCategory; 19] = [
        EntityCategory::Catalog,
        EntityCategory::Company,
        EntityCategory::Edge,
        EntityCategory::Location,
        EntityCategory::Media,
        EntityCategory::Network,
        EntityCategory::O365Job,
        EntityCategory::O365Location,
        EntityCategory::O365Org,
        EntityCategory::O365Restore,
        EntityCategory::Org,
        EntityCategory::Template,
        EntityCategory::Vdc,
        EntityCategory::Vapp,
        EntityCategory::VappNetwork,
        EntityCategory::VccLocation,
        EntityCategory::VccTenant,
        EntityCategory::Vpg,
        EntityCategory::Vm,
    ];

    /// Token used on the command line.
    pub fn token(self) -> &'static str {
        match self {
            EntityCategory::Catalog => "catalog",
            EntityCategory::Company => "company",
            EntityCategory::Edge => "edge",
            EntityCategory::Location => "location",
            EntityCategory::Media => "media",
            EntityCategory::Network => "network",
            EntityCategory::O365Job => "o365-job",
            EntityCategory::O365Location => "o365-location",
            EntityCategory::O365Org => "o365-org",
            EntityCategory::O365Restore => "o365-restore",
            EntityCategory::Org => "org",
            EntityCategory::Template => "template",
            EntityCategory::Vdc => "vdc",
            EntityCategory::Vapp => "vapp",
            EntityCategory::VappNetwork => "vapp-network",
            EntityCategory::VccLocation => "vcc-location",
            EntityCategory::VccTenant => "vcc-tenant",
            EntityCategory::Vpg => "vpg",
            EntityCategory::Vm => "vm",
        }
    }

    /// Key of this category under `entities` in the inventory response.
    pub fn api_key(self) -> &'static str {
        match self {
            EntityCategory::Catalog => "IAAS_CATALOG",
            EntityCategory::Company => "COMPANY",
            EntityCategory::Edge => "IAAS_EDGE",
            EntityCategory::Location => "IAAS_LOCATION",
            EntityCategory::Media => "IAAS_MEDIA",
            EntityCategory::Network => "IAAS_INTERNAL_NETWORK",
            EntityCategory::O365Job => "O365_JOB",
            EntityCategory::O365Location => "O365_LOCATION",
            EntityCategory::O365Org => "O365_ORGANIZATION",
            EntityCategory::O365Restore => "O365_RESTORE_SESSION",
            EntityCategory::Org => "IAAS_ORGANIZATION",
            EntityCategory::Template => "IAAS_VAPP_TEMPLATE",
            EntityCategory::Vdc => "IAAS_VDC",
            EntityCategory::Vapp => "IAAS_VAPP",
            EntityCategory::VappNetwork => "IAAS_VAPP_NETWORK",
            EntityCategory::VccLocation => "VCC_BACKUP_LOCATION",
            EntityCategory::VccTenant => "VCC_BACKUP_TENANT",
            EntityCategory::Vpg => "IAAS_VPG",
            EntityCategory::Vm => "IAAS_VM",
        }
    }

    /// All accepted tokens, comma separated, for error and help text.
    pub fn token_list() -> String {
        let mut tokens: Vec<&str> = Self::ALL.iter().map(|c| c.token()).collect();
        tokens.push(BACKUP_ALIAS);
        tokens.join(", ")
    }
}

impl FromStr for EntityCategory {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        if token == BACKUP_ALIAS {
            return Ok(EntityCategory::VccTenant);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.token() == token)
            .ok_or_else(|| Error::UnknownCategory {
                token: token.to_string(),
                expected: Self::token_list(),
            })
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Inventory of the first company visible to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    pub company_id: String,
    pub company_name: String,
    /// API category key to the records in server order.
    pub entities: Map<String, Value>,
}

impl Inventory {
    /// Shapes the raw `/users/{user}/inventory` response.
    ///
    /// Only the first company entry is used.
    pub fn from_json(raw: &Value) -> Result<Self> {
        let company = raw
            .get("inventory")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Schema("inventory response has no 'inventory' list".into()))?
            .first()
            .ok_or_else(|| Error::Schema("inventory response lists no companies".into()))?;

        let entities = company
            .get("entities")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::Schema("company inventory has no 'entities' object".into()))?
            .clone();

        Ok(Inventory {
            company_id: string_field(company, "company_id"),
            company_name: string_field(company, "company_name"),
            entities,
        })
    }

    /// Records of `category`, empty when the response omits it.
    pub fn entities(&self, category: EntityCategory) -> &[Value] {
        self.entities
            .get(category.api_key())
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Records for a CLI category token, in server order.
pub fn entities_of<'a>(inventory: &'a Inventory, token: &str) -> Result<&'a [Value]> {
    let category: EntityCategory = token.parse()?;
    Ok(inventory.entities(category))
}

fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Writes one `name, uuid` row per record, without a header.
///
/// Rows keep the input order. The UUID cell carries a leading space; names
/// containing commas or quotes are quoted, so the output reads back with
/// `csv::Trim::All`.
pub fn write_csv<W: Write>(records: &[Value], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for record in records {
        let uuid = string_field(record, "uuid");
        let uuid = if uuid.is_empty() {
            uuid
        } else {
            format!(" {}", uuid)
        };
        csv_writer.write_record([string_field(record, "name"), uuid])?;
    }

    csv_writer.flush()?;
    Ok(())
}
