use std::fs;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use url::Url;

use crate::i18n::Locale;

#[derive(Args, Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Base url of the management api
    #[clap(long, env = "CIM_ENDPOINT")]
    #[arg(default_value_t = default_endpoint())]
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,
    /// Bearer token sent with every request
    #[clap(long, env = "CIM_TOKEN")]
    #[serde(default)]
    pub token: Option<String>,
    /// Request timeout in seconds
    #[clap(long, env = "CIM_TIMEOUT")]
    #[arg(default_value_t = 30)]
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[clap(long, env)]
    #[arg(default_value_t = String::from("cimctl=info,cim_console=info"))]
    #[serde(default = "default_rust_log")]
    pub rust_log: String,
    #[clap(long, env = "CIM_LOCALE")]
    #[arg(value_enum, default_value_t = Locale::En)]
    #[serde(default)]
    pub locale: Locale,
}

fn default_endpoint() -> Url {
    Url::parse("http://127.0.0.1:8000").expect("static endpoint url")
}

fn default_timeout() -> u64 {
    30
}

fn default_rust_log() -> String {
    String::from("cimctl=info,cim_console=info")
}

pub fn load(cfg: &str) -> Result<ConsoleConfig> {
    let content =
        fs::read_to_string(cfg).context("could not read config file")?;
    toml::from_str(&content).context("could not parse config file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let config: ConsoleConfig =
            toml::from_str(r#"endpoint = "https://cim.example.com/console""#)
                .unwrap();
        assert_eq!(config.endpoint.as_str(), "https://cim.example.com/console");
        assert_eq!(config.token, None);
        assert_eq!(config.timeout, 30);
        assert_eq!(config.locale, Locale::En);

        let config: ConsoleConfig =
            toml::from_str("token = \"abc\"\nlocale = \"zh\"\ntimeout = 5")
                .unwrap();
        assert_eq!(config.endpoint.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, 5);
        assert_eq!(config.locale, Locale::Zh);
    }

    #[test]
    fn load_reports_missing_file() {
        assert!(load("/nonexistent/cimctl.toml").is_err());
    }
}
