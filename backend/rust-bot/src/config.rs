use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Routes served next to the webhook.
const RESERVED_PATHS: [&str; 2] = ["/health", "/metrics"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bot_token: String,
    pub telegram_api_url: String,
    pub listen_addr: String,
    pub webhook_path: String,
    pub public_url: Option<String>,
    pub tunnel: TunnelSettings,
    pub storage: StorageSettings,
    pub test_images: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TunnelSettings {
    pub enabled: bool,
    pub command: String,
    pub port: u16,
}

/// Locations of the on-disk documents. Every file lives under `data_dir`.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub answers_file: PathBuf,
    pub stats_file: PathBuf,
    pub export_file: PathBuf,
}

impl StorageSettings {
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            answers_file: data_dir.join("answers.json"),
            stats_file: data_dir.join("stats.json"),
            export_file: data_dir.join("student_stats.xlsx"),
            data_dir,
        }
    }
}

impl StorageSettings {
    /// Storage locations only. Unlike [`Config::load`] this needs no bot token.
    pub fn load() -> Result<Self, config::ConfigError> {
        Ok(Self::from_settings(&settings()?))
    }

    fn from_settings(settings: &config::Config) -> Self {
        let data_dir = settings
            .get_string("storage.data_dir")
            .or_else(|_| env::var("STATS_DIR"))
            .unwrap_or_else(|_| "stats".to_string());
        Self::in_dir(data_dir)
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = settings()?;

        let bot_token = settings
            .get_string("bot.token")
            .or_else(|_| env::var("BOT_TOKEN"))
            .map_err(|_| config::ConfigError::NotFound("BOT_TOKEN".to_string()))?;

        let telegram_api_url = settings
            .get_string("bot.api_url")
            .or_else(|_| env::var("TELEGRAM_API_URL"))
            .unwrap_or_else(|_| "https://api.telegram.org".to_string());

        let listen_addr = settings
            .get_string("server.listen_addr")
            .or_else(|_| env::var("LISTEN_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string());

        let webhook_path = settings
            .get_string("server.webhook_path")
            .or_else(|_| env::var("WEBHOOK_PATH"))
            .unwrap_or_else(|_| "/webhook".to_string());
        validate_webhook_path(&webhook_path)?;

        let public_url = settings
            .get_string("server.public_url")
            .or_else(|_| env::var("PUBLIC_URL"))
            .ok()
            .filter(|url| !url.trim().is_empty());

        let tunnel = TunnelSettings {
            enabled: settings
                .get_bool("tunnel.enabled")
                .or_else(|_| {
                    env::var("TUNNEL_ENABLED")
                        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                })
                .unwrap_or(false),
            command: settings
                .get_string("tunnel.command")
                .or_else(|_| env::var("TUNNEL_COMMAND"))
                .unwrap_or_else(|_| "ngrok".to_string()),
            port: settings
                .get_int("tunnel.port")
                .ok()
                .and_then(|port| u16::try_from(port).ok())
                .unwrap_or_else(|| port_from_addr(&listen_addr).unwrap_or(5000)),
        };

        let storage = StorageSettings::from_settings(&settings);

        let test_images = settings
            .get::<Vec<String>>("bot.test_images")
            .or_else(|_| env::var("TEST_IMAGES").map(|raw| split_list(&raw)))
            .unwrap_or_default()
            .into_iter()
            .map(PathBuf::from)
            .collect();

        Ok(Config {
            bot_token,
            telegram_api_url,
            listen_addr,
            webhook_path,
            public_url,
            tunnel,
            storage,
            test_images,
        })
    }
}

fn settings() -> Result<config::Config, config::ConfigError> {
    // Local .env is optional; real deployments pass plain env vars
    dotenvy::dotenv().ok();

    // Determine environment (defaults to dev)
    let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

    // Build configuration from config/*.toml + ENV overrides
    config::Config::builder()
        .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
        // Override with environment variables (prefix: APP_)
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()
}

/// The path becomes a literal route, so it must not collide with the built-in
/// routes or contain router capture syntax.
fn validate_webhook_path(path: &str) -> Result<(), config::ConfigError> {
    let has_capture = path.contains(['{', '}', '*'])
        || path.split('/').any(|segment| segment.starts_with(':'));
    if !path.starts_with('/') || RESERVED_PATHS.contains(&path) || has_capture {
        return Err(config::ConfigError::Message(format!(
            "invalid webhook path '{}': must start with '/', have no route captures and not be one of {:?}",
            path, RESERVED_PATHS
        )));
    }
    Ok(())
}

fn port_from_addr(addr: &str) -> Option<u16> {
    addr.rsplit(':').next()?.parse().ok()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
