pub mod catalog;
mod currency;
mod form;
mod items;
mod services;

pub use catalog::{ServiceDefinition, SERVICES};
pub use currency::{coerce_amount, format_cents, parse_decimal, round_cents, CurrencyFormatter};
pub use form::{calculate_total, ClientField, ClientInfo, QuoteForm};
pub use items::{ItemInput, LineItem, LineItemTable, RowId};
pub use services::{DetailField, ServiceState, Visibility};
