use serde::Serialize;
use std::fmt;

use super::currency::{format_cents, parse_decimal};
use crate::error::{QuoteError, Result};

/// Stable handle to a row of the item table; never reused within a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RowId(u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A material or part cost typed in by the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub id: RowId,
    pub description: String,
    pub amount: f64,
    /// Text shown in the editable amount cell
    pub cell: String,
}

/// The two inputs above the table that feed `add`
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ItemInput {
    pub description: String,
    pub amount: String,
}

/// Ordered line items; the rendered table is a projection of `rows`
#[derive(Debug, Default)]
pub struct LineItemTable {
    rows: Vec<LineItem>,
    next_id: u64,
}

impl LineItemTable {
    pub fn rows(&self) -> &[LineItem] {
        &self.rows
    }

    pub fn sum(&self) -> f64 {
        self.rows.iter().map(|row| row.amount).sum()
    }

    /// Append an item from the pending inputs and clear them. Rejects a blank
    /// description or an amount that is not strictly positive, leaving both
    /// the table and the inputs untouched.
    pub fn add(&mut self, input: &mut ItemInput) -> Result<RowId> {
        let amount = parse_decimal(&input.amount).filter(|v| *v > 0.0);
        let amount = match amount {
            Some(amount) if !input.description.trim().is_empty() => amount,
            _ => {
                return Err(QuoteError::InvalidLineItem {
                    description: input.description.clone(),
                    amount: input.amount.clone(),
                })
            }
        };

        let id = RowId(self.next_id);
        self.next_id += 1;
        self.rows.push(LineItem {
            id,
            description: std::mem::take(&mut input.description),
            amount,
            cell: format_cents(amount),
        });
        input.amount.clear();

        Ok(id)
    }

    /// Commit an edited amount cell. Invalid or negative text resets the
    /// cell to `0.00` and is reported; the reset still happens.
    pub fn edit(&mut self, id: RowId, text: &str) -> Result<()> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| QuoteError::UnknownRow(id.to_string()))?;

        match parse_decimal(text) {
            Some(amount) if amount >= 0.0 => {
                row.amount = amount;
                row.cell = format_cents(amount);
                Ok(())
            }
            _ => {
                row.amount = 0.0;
                row.cell = "0.00".to_string();
                Err(QuoteError::InvalidItemAmount(text.to_string()))
            }
        }
    }

    pub fn remove(&mut self, id: RowId) -> Result<LineItem> {
        let idx = self
            .rows
            .iter()
            .position(|row| row.id == id)
            .ok_or_else(|| QuoteError::UnknownRow(id.to_string()))?;
        Ok(self.rows.remove(idx))
    }

    /// Resolve a 1-based position as displayed in the table
    pub fn resolve(&self, reference: &str) -> Result<RowId> {
        reference
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|pos| *pos > 0)
            .and_then(|pos| self.rows.get(pos - 1))
            .map(|row| row.id)
            .ok_or_else(|| QuoteError::UnknownRow(reference.to_string()))
    }
}
