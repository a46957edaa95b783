use chrono::NaiveDate;
use serde::Serialize;

use super::catalog::{self, SERVICES};
use super::currency::{coerce_amount, CurrencyFormatter};
use super::items::{ItemInput, LineItem, LineItemTable, RowId};
use super::services::ServiceState;
use crate::config::CurrencySettings;
use crate::error::{QuoteError, Result};

#[derive(Debug, Default, Clone, Serialize)]
pub struct ClientInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    Name,
    Address,
    Phone,
}

/// Everything the quote form holds. Each handler mutates the state and then
/// recomputes the total before returning, so `total_display` is never stale.
#[derive(Debug)]
pub struct QuoteForm {
    client: ClientInfo,
    date: Option<NaiveDate>,
    services: Vec<ServiceState>,
    items: LineItemTable,
    item_input: ItemInput,
    misc_cost: String,
    notes: String,
    formatter: CurrencyFormatter,
    total: f64,
    total_display: String,
}

impl QuoteForm {
    pub fn new(currency: CurrencySettings) -> Self {
        let formatter = CurrencyFormatter::new(currency);
        let total_display = formatter.format(0.0);
        Self {
            client: ClientInfo::default(),
            date: None,
            services: SERVICES.iter().map(ServiceState::new).collect(),
            items: LineItemTable::default(),
            item_input: ItemInput::default(),
            misc_cost: String::new(),
            notes: String::new(),
            formatter,
            total: 0.0,
            total_display,
        }
    }

    pub fn client(&self) -> &ClientInfo {
        &self.client
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn services(&self) -> &[ServiceState] {
        &self.services
    }

    pub fn service(&self, name: &str) -> Option<&ServiceState> {
        let def = catalog::lookup(name)?;
        self.services.iter().find(|s| s.def.id == def.id)
    }

    pub fn items(&self) -> &[LineItem] {
        self.items.rows()
    }

    pub fn items_input_mut(&mut self) -> &mut ItemInput {
        &mut self.item_input
    }

    pub fn misc_cost(&self) -> &str {
        &self.misc_cost
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn formatter(&self) -> &CurrencyFormatter {
        &self.formatter
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// The formatted total as last written by the calculator
    pub fn total_display(&self) -> &str {
        &self.total_display
    }

    pub fn set_client_field(&mut self, field: ClientField, value: &str) {
        let slot = match field {
            ClientField::Name => &mut self.client.name,
            ClientField::Address => &mut self.client.address,
            ClientField::Phone => &mut self.client.phone,
        };
        *slot = value.to_string();
    }

    /// Set the quote date from `YYYY-MM-DD`; a blank value clears it
    pub fn set_date(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            self.date = None;
            return Ok(());
        }
        let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|_| QuoteError::InvalidDate(text.to_string()))?;
        self.date = Some(date);
        Ok(())
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
    }

    pub fn set_service_checked(&mut self, name: &str, checked: bool) -> Result<()> {
        self.service_mut(name)?.set_checked(checked);
        self.recalculate();
        Ok(())
    }

    pub fn set_service_amount(&mut self, name: &str, amount: &str) -> Result<()> {
        self.service_mut(name)?.amount = amount.to_string();
        self.recalculate();
        Ok(())
    }

    pub fn set_service_detail(&mut self, name: &str, text: &str) -> Result<()> {
        self.service_mut(name)?.set_detail(text)
    }

    pub fn set_misc_cost(&mut self, text: &str) {
        self.misc_cost = text.to_string();
        self.recalculate();
    }

    /// Add a line item from the pending inputs
    pub fn add_item(&mut self) -> Result<RowId> {
        let id = self.items.add(&mut self.item_input)?;
        self.recalculate();
        tracing::debug!(row = %id, total = self.total, "line item added");
        Ok(id)
    }

    /// Commit an edited amount cell. On a validation error the cell has
    /// already been reset to zero and the total reflects it.
    pub fn edit_item(&mut self, id: RowId, text: &str) -> Result<()> {
        let outcome = self.items.edit(id, text);
        if !matches!(outcome, Err(QuoteError::UnknownRow(_))) {
            self.recalculate();
            tracing::debug!(row = %id, total = self.total, "line item edited");
        }
        outcome
    }

    pub fn remove_item(&mut self, id: RowId) -> Result<LineItem> {
        let removed = self.items.remove(id)?;
        self.recalculate();
        tracing::debug!(row = %id, total = self.total, "line item removed");
        Ok(removed)
    }

    /// Resolve a 1-based table position to its row
    pub fn resolve_item(&self, position: &str) -> Result<RowId> {
        self.items.resolve(position)
    }

    fn service_mut(&mut self, name: &str) -> Result<&mut ServiceState> {
        let def = catalog::lookup(name).ok_or_else(|| QuoteError::UnknownService(name.to_string()))?;
        self.services
            .iter_mut()
            .find(|s| s.def.id == def.id)
            .ok_or_else(|| QuoteError::UnknownService(name.to_string()))
    }

    fn recalculate(&mut self) {
        self.total = calculate_total(&self.services, &self.items, &self.misc_cost);
        self.total_display = self.formatter.format(self.total);
    }
}

/// Checked services + line items + misc cost, with unreadable inputs as zero
pub fn calculate_total(services: &[ServiceState], items: &LineItemTable, misc_cost: &str) -> f64 {
    let services: f64 = services
        .iter()
        .filter(|s| s.checked)
        .map(|s| coerce_amount(&s.amount))
        .sum();
    services + items.sum() + coerce_amount(misc_cost)
}
