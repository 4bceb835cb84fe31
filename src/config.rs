use serde::{Deserialize, Serialize};

use crate::util::cwarn;

pub const CONFIG_STORAGE_KEY: &str = "pb_config";
pub const VIEWER_NAME_KEY: &str = "polaroid-name";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Base URL of the photo store's HTTP API, without trailing slash.
    pub api_base: String,
    /// How often the live photo feed re-reads the canvas.
    pub poll_interval_ms: u32,
    pub debug_log: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            poll_interval_ms: 2000,
            debug_log: false,
        }
    }
}

impl BoardConfig {
    /// Parses a stored config; missing fields take their defaults and
    /// malformed JSON falls back to the default config.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<BoardConfig>(raw) {
            Ok(mut cfg) => {
                while cfg.api_base.ends_with('/') {
                    cfg.api_base.pop();
                }
                cfg.poll_interval_ms = cfg.poll_interval_ms.max(250);
                cfg
            }
            Err(err) => {
                cwarn(&format!("ignoring malformed {}: {}", CONFIG_STORAGE_KEY, err));
                BoardConfig::default()
            }
        }
    }

    pub fn load() -> Self {
        if let Some(win) = web_sys::window() {
            if let Ok(Some(store)) = win.local_storage() {
                if let Ok(Some(raw)) = store.get_item(CONFIG_STORAGE_KEY) {
                    return BoardConfig::from_json(&raw);
                }
            }
        }
        BoardConfig::default()
    }
}

pub fn load_viewer_name() -> Option<String> {
    let win = web_sys::window()?;
    let store = win.local_storage().ok()??;
    let name = store.get_item(VIEWER_NAME_KEY).ok()??;
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Extracts the canvas slug from a location hash such as `#/c/party-a1b2`
/// or `#/c/party-a1b2/canvas`.
pub fn slug_from_hash(hash: &str) -> Option<String> {
    let path = hash.trim_start_matches('#').trim_start_matches('/');
    let mut parts = path.split('/').filter(|p| !p.is_empty());
    if parts.next()? != "c" {
        return None;
    }
    let slug = parts.next()?;
    match parts.next() {
        None | Some("canvas") => Some(slug.to_string()),
        Some(_) => None,
    }
}

pub fn current_slug() -> Option<String> {
    let hash = web_sys::window()?.location().hash().ok()?;
    slug_from_hash(&hash)
}
