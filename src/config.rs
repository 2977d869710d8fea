//! Process configuration, read once at startup from the environment.
//!
//! Defaults reproduce the fixed OpenRouter wire contract; the URL and model can be
//! overridden so the bridge can be pointed at a local stand-in.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::StartupError;

pub const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-thinking-exp:free";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_REFERER: &str = "https://docbotllmunity.onrender.com";
pub const DEFAULT_TITLE: &str = "MFPS 2.0 Architecture Assistant";
pub const DEFAULT_USER_AGENT: &str = "MFPS-2.0/1.0.0";

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// OpenRouter key. Not validated: an empty key surfaces as an upstream auth error.
    pub api_key: String,
    pub reference_path: PathBuf,
    pub static_dir: PathBuf,
    pub index_file: PathBuf,
    pub model: String,
    pub upstream_url: String,
    pub timeout: Duration,
    pub referer: String,
    pub title: String,
    pub user_agent: String,
    /// Value of the `OR-PROMPT-TRAINING` opt-in header.
    pub prompt_training: String,
    pub prompt_config_path: Option<PathBuf>,
    pub bind_addr: String,
    pub no_proxy: bool,
    pub proxy_url: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        let static_dir = PathBuf::from("static");
        Self {
            api_key: String::new(),
            reference_path: PathBuf::from("codebase.txt"),
            index_file: static_dir.join("index.html"),
            static_dir,
            model: DEFAULT_MODEL.to_string(),
            upstream_url: OPENROUTER_CHAT_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            prompt_training: "allow".to_string(),
            prompt_config_path: None,
            bind_addr: "0.0.0.0:8088".to_string(),
            no_proxy: false,
            proxy_url: None,
        }
    }
}

impl BridgeConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut cfg = Self::default();

        if let Some(key) = lookup("OPENROUTER_API_KEY") {
            cfg.api_key = key.trim().to_string();
        }
        if let Some(p) = get("CODEBASE_FILE") {
            cfg.reference_path = PathBuf::from(p);
        }
        if let Some(p) = get("STATIC_DIR") {
            cfg.static_dir = PathBuf::from(p);
        }
        cfg.index_file = match get("INDEX_FILE") {
            Some(p) => PathBuf::from(p),
            None => cfg.static_dir.join("index.html"),
        };
        if let Some(m) = get("CHATBRIDGE_MODEL") {
            cfg.model = m;
        }
        if let Some(u) = get("CHATBRIDGE_UPSTREAM_URL") {
            cfg.upstream_url = u;
        }
        if let Some(secs) = get("CHATBRIDGE_HTTP_TIMEOUT_SECONDS") {
            let n = secs
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(StartupError::InvalidSetting {
                    key: "CHATBRIDGE_HTTP_TIMEOUT_SECONDS",
                    value: secs,
                })?;
            cfg.timeout = Duration::from_secs(n);
        }
        if let Some(v) = get("CHATBRIDGE_REFERER") {
            cfg.referer = v;
        }
        if let Some(v) = get("CHATBRIDGE_TITLE") {
            cfg.title = v;
        }
        if let Some(v) = get("CHATBRIDGE_USER_AGENT") {
            cfg.user_agent = v;
        }
        if let Some(v) = get("CHATBRIDGE_PROMPT_TRAINING") {
            cfg.prompt_training = v;
        }
        cfg.prompt_config_path = get("CHATBRIDGE_PROMPT_CONFIG").map(PathBuf::from);
        if let Some(addr) = get("BIND_ADDR") {
            cfg.bind_addr = addr;
        }
        cfg.no_proxy = get("CHATBRIDGE_NO_PROXY")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);
        cfg.proxy_url = get("CHATBRIDGE_PROXY_URL");

        Ok(cfg)
    }
}

/// Accepts 1, true, yes, on (case-insensitive).
pub fn is_truthy(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
