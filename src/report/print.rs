use chrono::NaiveDate;
use std::path::Path;

use crate::error::{QuoteError, Result};

/// File name for a printed quote, e.g. `ORCAMENTO-maria-silva-2024-03-05.html`
pub fn report_file_name(client_name: &str, day: NaiveDate) -> String {
    let mut slug = String::new();
    for ch in client_name.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "cliente" } else { slug };
    format!("ORCAMENTO-{}-{}.html", slug, day.format("%Y-%m-%d"))
}

/// Write the finished document, creating the output directory if needed
pub fn write_report(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// Hand a report to the system browser. The viewer is not waited on.
pub fn open_path(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()
            .map_err(QuoteError::Io)?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()
            .map_err(QuoteError::Io)?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", path.to_str().unwrap_or("")])
            .spawn()
            .map_err(QuoteError::Io)?;
    }
    Ok(())
}
