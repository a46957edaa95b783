mod company;
mod draft;

pub use company::{Company, Config, CurrencySettings, OutputSettings, QuoteSettings};
pub use draft::{load_draft, Draft, DraftClient, DraftItem, DraftService};

use crate::error::{QuoteError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.quote/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "quote") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.quote/
    let home = dirs_home().ok_or_else(|| {
        QuoteError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".quote"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Load config.toml, falling back to the built-in defaults when it is absent
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| QuoteError::ConfigParse { path, source: e })
}

/// Resolve the report output directory; relative paths hang off the config dir
pub fn resolve_output_dir(config: &Config, config_dir: &Path) -> PathBuf {
    match config.output.dir.as_deref() {
        Some(dir) => {
            let path = expand_path(dir);
            if path.is_absolute() {
                path
            } else {
                config_dir.join(path)
            }
        }
        None => config_dir.join("output"),
    }
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[company]
name = "postGit"
phone = "(87) postGit"
attendant = "postGit"
# subtitle = "Referente a Sistemas de Segurança e Instalações Elétricas"

[quote]
validity_days = 15
auto_print = true       # print as soon as the browser has loaded the report

[currency]
symbol = "R$"
decimal_separator = ","
group_separator = "."

[output]
# dir = "~/Documents/orcamentos"   # default: <config dir>/output
"#;
