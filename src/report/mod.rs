mod html;
mod print;
mod snapshot;

pub use html::{escape_html, render_html};
pub use print::{open_path, report_file_name, write_report};
pub use snapshot::{CategoryGroup, ReportItemRow, ReportSnapshot, ServiceEntry};

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::quote::{CurrencyFormatter, QuoteForm};

/// Snapshot the form, write the printable document into `output_dir`, and
/// optionally open it in the browser, which prints it once loaded.
pub fn print_quote(form: &QuoteForm, config: &Config, output_dir: &Path, open: bool) -> Result<PathBuf> {
    let snapshot = ReportSnapshot::capture(form);
    let today = chrono::Local::now().date_naive();
    let path = output_dir.join(report_file_name(&snapshot.client.name, today));
    print_snapshot(&snapshot, form.formatter(), config, &path, open)?;
    Ok(path)
}

/// Render an already captured snapshot to `path`
pub fn print_snapshot(
    snapshot: &ReportSnapshot,
    fmt: &CurrencyFormatter,
    config: &Config,
    path: &Path,
    open: bool,
) -> Result<()> {
    let document = render_html(snapshot, fmt, config);
    write_report(&document, path)?;
    tracing::info!(
        path = %path.display(),
        services = snapshot.service_count(),
        items = snapshot.items.len(),
        total = %snapshot.total_display,
        "report written"
    );

    if open {
        match open_path(path) {
            Ok(()) => tracing::info!(path = %path.display(), "report opened for printing"),
            Err(e) => tracing::warn!(error = %e, "could not open the report viewer"),
        }
    }
    Ok(())
}
