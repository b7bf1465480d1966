use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub bot: Bot,
    pub webhook: Webhook,
    pub resolver: Resolver,
    pub store: Store,
    pub link: Link,
    pub http: Http,
    pub log: Log,
}

#[derive(Deserialize)]
pub struct Bot {
    pub credential: String,
    pub api_base: String,
    pub token_url: String,
    pub guide_url: String,
}

// The credential must never end up in the logs; everything that prints
// Settings goes through here.
impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("credential", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("token_url", &self.token_url)
            .field("guide_url", &self.guide_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct Webhook {
    /// Externally reachable base address. Absent means long polling.
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Resolver {
    pub backend: String, // "fake" or "real"
    pub endpoint: String,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "file" or "memory"
    pub token_file: String,
    pub valid_hours: i64,
}

#[derive(Debug, Deserialize)]
pub struct Link {
    pub markers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_is_redacted_from_debug_output() {
        let bot = Bot {
            credential: "12345:very-secret".to_string(),
            api_base: "https://api.telegram.org".to_string(),
            token_url: "https://t.example".to_string(),
            guide_url: "https://g.example".to_string(),
        };

        let printed = format!("{:?}", bot);

        assert!(!printed.contains("very-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
