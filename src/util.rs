use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{is_truthy, BridgeConfig};
use crate::error::StartupError;
use crate::prompt::{PromptTemplate, ReferenceDocument};
use crate::prompt_config::PromptConfig;
use crate::upstream::UpstreamClient;

/// Initialize dotenv and structured tracing based on RUST_LOG.
/// - Supports explicit env file paths via ENV_FILE, DOTENV_PATH
/// - Falls back to default .env discovery
/// - Logs the source used
pub fn init_tracing() {
    let mut env_source: String = "none".into();
    for key in ["ENV_FILE", "DOTENV_PATH"] {
        if let Ok(p) = std::env::var(key) {
            let p = p.trim();
            if !p.is_empty()
                && std::path::Path::new(p).is_file()
                && dotenvy::from_filename(p).is_ok()
            {
                env_source = format!("{p} ({key})");
                break;
            }
        }
    }

    if env_source == "none" {
        if let Ok(path) = dotenvy::dotenv() {
            env_source = path.display().to_string();
        }
    }

    // Respects RUST_LOG potentially provided by the env file
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=info".into());
    let subscriber = fmt().with_env_filter(EnvFilter::new(filter)).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::info!("Environment loaded from: {}", env_source);
}

/// Shared, read-only application state. Nothing in here is written after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub reference: ReferenceDocument,
    pub template: Arc<PromptTemplate>,
    pub static_dir: PathBuf,
    pub index_file: PathBuf,
}

impl AppState {
    /// Load everything the process needs before serving: the reference document, the
    /// optional persona override and the upstream HTTP client.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, StartupError> {
        let reference = ReferenceDocument::load(&config.reference_path)?;

        let template = match &config.prompt_config_path {
            Some(path) => {
                tracing::info!("Loading prompt configuration from: {}", path.display());
                PromptConfig::load_from_file(path)
                    .map_err(StartupError::PromptConfig)?
                    .into_template()
            }
            None => PromptTemplate::default(),
        };

        if config.api_key.is_empty() {
            tracing::warn!("OPENROUTER_API_KEY is not set; upstream calls will be unauthorized");
        }
        if !config.index_file.is_file() {
            tracing::warn!(path = %config.index_file.display(), "index page not found; GET / will return 404");
        }

        let http = build_http_client(config)?;
        Ok(Self {
            upstream: UpstreamClient::new(http, config),
            reference,
            template: Arc::new(template),
            static_dir: config.static_dir.clone(),
            index_file: config.index_file.clone(),
        })
    }
}

/// Build the outbound HTTP client honoring the proxy settings in `config`.
///
/// The per-request timeout is applied by `UpstreamClient`; the connect timeout here is
/// bounded by the same value.
pub fn build_http_client(config: &BridgeConfig) -> Result<reqwest::Client, StartupError> {
    let mut builder = reqwest::Client::builder().connect_timeout(config.timeout);

    if config.no_proxy {
        builder = builder.no_proxy();
    } else if let Some(url) = config.proxy_url.as_deref() {
        let proxy = reqwest::Proxy::all(url).map_err(|_| StartupError::InvalidSetting {
            key: "CHATBRIDGE_PROXY_URL",
            value: url.to_string(),
        })?;
        builder = builder.proxy(proxy);
    }

    builder = builder.user_agent(format!("chatbridge/{}", env!("CARGO_PKG_VERSION")));

    builder.build().map_err(StartupError::HttpClient)
}

/// Resolve when Ctrl-C or SIGTERM is received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

/// Parse a comma-separated env list; `*`, unset, or a list with no valid entries yields `None`
/// (meaning "any").
fn env_list<T>(key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<Vec<T>> {
    let raw = std::env::var(key).ok()?;
    let s = raw.trim();
    if s == "*" {
        return None;
    }
    let vals: Vec<T> = s
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter_map(parse)
        .collect();
    if vals.is_empty() {
        None
    } else {
        Some(vals)
    }
}

/// Build a CORS layer from environment variables.
///
/// Environment variables:
/// - CORS_ALLOWED_ORIGINS: "*" or comma-separated origins (e.g., "https://a.com, https://b.com")
/// - CORS_ALLOWED_METHODS: "*" or comma-separated methods (e.g., "GET,POST,OPTIONS")
/// - CORS_ALLOWED_HEADERS: "*" or comma-separated request header names
/// - CORS_ALLOW_CREDENTIALS: enable with 1,true,yes,on
/// - CORS_MAX_AGE: max age in seconds (u64)
///
/// Defaults are permissive (Any).
pub fn cors_layer_from_env() -> tower_http::cors::CorsLayer {
    use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

    let mut layer = CorsLayer::new();
    let mut wildcard = false;

    layer = match env_list("CORS_ALLOWED_ORIGINS", |p| {
        http::HeaderValue::from_str(p).ok()
    }) {
        Some(vals) => layer.allow_origin(AllowOrigin::list(vals)),
        None => {
            wildcard = true;
            layer.allow_origin(Any)
        }
    };

    layer = match env_list("CORS_ALLOWED_METHODS", |p| {
        http::Method::from_bytes(p.to_ascii_uppercase().as_bytes()).ok()
    }) {
        Some(vals) => layer.allow_methods(AllowMethods::list(vals)),
        None => {
            wildcard = true;
            layer.allow_methods(Any)
        }
    };

    layer = match env_list("CORS_ALLOWED_HEADERS", |p| {
        http::header::HeaderName::try_from(p).ok()
    }) {
        Some(vals) => layer.allow_headers(AllowHeaders::list(vals)),
        None => {
            wildcard = true;
            layer.allow_headers(Any)
        }
    };

    // tower-http rejects credentials combined with any wildcard.
    if let Ok(val) = std::env::var("CORS_ALLOW_CREDENTIALS") {
        if is_truthy(&val) {
            if wildcard {
                tracing::warn!(
                    "CORS_ALLOW_CREDENTIALS ignored because another CORS setting is a wildcard"
                );
            } else {
                layer = layer.allow_credentials(true);
            }
        }
    }

    if let Ok(secs) = std::env::var("CORS_MAX_AGE") {
        if let Ok(n) = secs.trim().parse::<u64>() {
            layer = layer.max_age(Duration::from_secs(n));
        }
    }

    layer
}
