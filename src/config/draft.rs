use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{QuoteError, Result};
use crate::quote::{catalog, ClientField, QuoteForm};

/// A form fill-in stored as TOML, replayed through the same handlers the
/// interactive session uses.
#[derive(Debug, Deserialize, Default)]
pub struct Draft {
    #[serde(default)]
    pub client: DraftClient,
    /// `YYYY-MM-DD`, quoted or as a bare TOML date
    #[serde(default, deserialize_with = "date_text")]
    pub date: Option<String>,
    #[serde(default)]
    pub misc: Option<DraftText>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Keyed by service id or field id; presence means the checkbox is checked
    #[serde(default)]
    pub services: BTreeMap<String, DraftService>,
    #[serde(default)]
    pub items: Vec<DraftItem>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DraftClient {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DraftService {
    #[serde(default)]
    pub amount: Option<DraftText>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DraftItem {
    pub description: String,
    pub amount: DraftText,
}

/// A field typed either as a TOML scalar or as the raw text a user would
/// have typed into the input
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum DraftText {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for DraftText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftText::Integer(n) => write!(f, "{n}"),
            DraftText::Float(n) => write!(f, "{n}"),
            DraftText::Text(s) => f.write_str(s),
        }
    }
}

fn date_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<toml::Value>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        toml::Value::String(text) => text,
        toml::Value::Datetime(datetime) => datetime.to_string(),
        other => other.to_string(),
    }))
}

/// Load a draft file
pub fn load_draft(path: &Path) -> Result<Draft> {
    if !path.exists() {
        return Err(QuoteError::DraftNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| QuoteError::DraftParse {
        path: path.to_path_buf(),
        source: e,
    })
}

impl Draft {
    /// Replay the draft into `form`: client, date, services in catalog
    /// order, items in file order, misc cost, notes.
    pub fn apply_to(&self, form: &mut QuoteForm) -> Result<()> {
        let client = [
            (ClientField::Name, &self.client.name),
            (ClientField::Address, &self.client.address),
            (ClientField::Phone, &self.client.phone),
        ];
        for (field, value) in client {
            if let Some(value) = value {
                form.set_client_field(field, value);
            }
        }

        if let Some(date) = &self.date {
            form.set_date(date)?;
        }

        let mut services = BTreeMap::new();
        for (key, service) in &self.services {
            let def =
                catalog::lookup(key).ok_or_else(|| QuoteError::UnknownService(key.clone()))?;
            if services.insert(def.id, service).is_some() {
                return Err(QuoteError::DuplicateService(def.id.to_string()));
            }
        }
        for def in catalog::SERVICES.iter() {
            let Some(service) = services.get(def.id) else {
                continue;
            };
            form.set_service_checked(def.id, true)?;
            if let Some(amount) = &service.amount {
                form.set_service_amount(def.id, &amount.to_string())?;
            }
            if let Some(detail) = &service.detail {
                form.set_service_detail(def.id, detail)?;
            }
        }

        for item in &self.items {
            form.items_input_mut().description = item.description.clone();
            form.items_input_mut().amount = item.amount.to_string();
            form.add_item()?;
        }

        if let Some(misc) = &self.misc {
            form.set_misc_cost(&misc.to_string());
        }
        if let Some(notes) = &self.notes {
            form.set_notes(notes);
        }

        Ok(())
    }
}
