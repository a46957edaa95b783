pub mod config;
pub mod error;
pub mod logging;
pub mod quote;
pub mod report;
pub mod session;

pub use config::{Config, Draft};
pub use error::{QuoteError, Result};
pub use quote::{QuoteForm, ServiceDefinition, SERVICES};
pub use report::{print_quote, render_html, ReportSnapshot};
pub use session::{run_session, Session};
