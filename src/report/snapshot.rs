use chrono::NaiveDate;
use serde::Serialize;

use crate::quote::{coerce_amount, ClientInfo, QuoteForm};

/// A selected service as it appears on the printed quote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceEntry {
    pub label: String,
    pub amount: f64,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub services: Vec<ServiceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportItemRow {
    pub description: String,
    pub amount: f64,
}

/// Everything the printed quote shows, read from the form in one pass
#[derive(Debug, Clone, Serialize)]
pub struct ReportSnapshot {
    pub client: ClientInfo,
    pub date: Option<NaiveDate>,
    pub categories: Vec<CategoryGroup>,
    pub items: Vec<ReportItemRow>,
    pub misc_cost: f64,
    /// Present only when the notes hold something besides whitespace
    pub notes: Option<String>,
    /// The form's total display, reused rather than recomputed
    pub total_display: String,
}

impl ReportSnapshot {
    pub fn capture(form: &QuoteForm) -> Self {
        let mut categories: Vec<CategoryGroup> = Vec::new();

        for service in form.services().iter().filter(|s| s.checked) {
            let detail = service.detail.text.trim();
            let entry = ServiceEntry {
                label: service.def.label.to_string(),
                amount: coerce_amount(&service.amount),
                detail: (!detail.is_empty()).then(|| detail.to_string()),
            };

            match categories.iter_mut().find(|g| g.category == service.def.category) {
                Some(group) => group.services.push(entry),
                None => categories.push(CategoryGroup {
                    category: service.def.category.to_string(),
                    services: vec![entry],
                }),
            }
        }

        let items = form
            .items()
            .iter()
            .map(|item| ReportItemRow {
                description: item.description.clone(),
                amount: item.amount,
            })
            .collect();

        let notes = form.notes();

        Self {
            client: form.client().clone(),
            date: form.date(),
            categories,
            items,
            misc_cost: coerce_amount(form.misc_cost()),
            notes: (!notes.trim().is_empty()).then(|| notes.to_string()),
            total_display: form.total_display().to_string(),
        }
    }

    pub fn service_count(&self) -> usize {
        self.categories.iter().map(|g| g.services.len()).sum()
    }

    /// `DD/MM/YYYY`, or `None` when no date was given
    pub fn date_display(&self) -> Option<String> {
        self.date.map(|d| d.format("%d/%m/%Y").to_string())
    }
}
