use serde::{Deserialize, Serialize};

const SETTINGS_KEY: &str = "finance-binder-settings";

/// Client-side knobs, read from `localStorage` so they can be changed from
/// the browser console without a rebuild.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub currency_symbol: String,
    pub log_level: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        ClientSettings {
            currency_symbol: "€".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ClientSettings {
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

/// Loads the page settings, falling back to defaults when storage is
/// unavailable or the stored entry does not parse.
pub fn load_settings() -> ClientSettings {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(raw)) = storage.get_item(SETTINGS_KEY) {
                if let Some(settings) = ClientSettings::from_json(&raw) {
                    return settings;
                }
            }
        }
    }
    ClientSettings::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings = ClientSettings::from_json(r#"{"log_level":"debug"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.level(), log::Level::Debug);
    }

    #[test]
    fn bad_level_falls_back_to_info() {
        let settings = ClientSettings::from_json(r#"{"log_level":"loud"}"#).unwrap();
        assert_eq!(settings.level(), log::Level::Info);
        assert!(ClientSettings::from_json("not json").is_none());
    }
}
