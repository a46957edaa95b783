use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub quote: QuoteSettings,
    #[serde(default)]
    pub currency: CurrencySettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Shown in the report header and the footer contact block
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Company {
    pub name: String,
    pub phone: String,
    pub attendant: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
}

impl Default for Company {
    fn default() -> Self {
        Self {
            name: "postGit".to_string(),
            phone: "(87) postGit".to_string(),
            attendant: "postGit".to_string(),
            subtitle: default_subtitle(),
        }
    }
}

fn default_subtitle() -> String {
    "Referente a Sistemas de Segurança e Instalações Elétricas".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QuoteSettings {
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
    /// Print as soon as the browser finishes loading the report
    #[serde(default = "default_true")]
    pub auto_print: bool,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            validity_days: default_validity_days(),
            auto_print: true,
        }
    }
}

fn default_validity_days() -> u32 {
    15
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CurrencySettings {
    pub symbol: String,
    pub decimal_separator: char,
    pub group_separator: char,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            symbol: "R$".to_string(),
            decimal_separator: ',',
            group_separator: '.',
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OutputSettings {
    /// Where printed reports are written (default: <config dir>/output)
    #[serde(default)]
    pub dir: Option<String>,
}
