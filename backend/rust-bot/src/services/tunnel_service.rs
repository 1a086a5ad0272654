use std::process::Stdio;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};

use crate::config::TunnelSettings;

/// A running tunnel process. The child is killed when this is dropped.
pub struct Tunnel {
    _child: Child,
    pub public_url: String,
}

/// Spawns `<command> http <port> --log stdout` and waits for the public URL
/// to show up in its log. Returns `None` if the process exits without one.
pub async fn start(settings: &TunnelSettings) -> Result<Option<Tunnel>> {
    tracing::info!(
        "Starting tunnel: {} http {}",
        settings.command,
        settings.port
    );

    let mut child = Command::new(&settings.command)
        .arg("http")
        .arg(settings.port.to_string())
        .args(["--log", "stdout"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("Failed to spawn tunnel command '{}'", settings.command))?;

    let stdout = child
        .stdout
        .take()
        .context("Tunnel process has no stdout")?;
    let mut lines = BufReader::new(stdout).lines();

    while let Some(line) = lines.next_line().await? {
        if let Some(url) = parse_public_url(&line) {
            tracing::info!("Tunnel URL: {}", url);

            // Keep draining the log so the child never blocks on a full pipe
            tokio::spawn(async move {
                while let Ok(Some(_)) = lines.next_line().await {}
            });

            return Ok(Some(Tunnel {
                _child: child,
                public_url: url,
            }));
        }
    }

    tracing::error!("Tunnel process exited without reporting a public URL");
    Ok(None)
}

/// Extracts the value of `url=` from a tunnel log line.
pub fn parse_public_url(line: &str) -> Option<String> {
    static URL_FIELD: OnceLock<Regex> = OnceLock::new();
    let re = URL_FIELD.get_or_init(|| Regex::new(r"url=(\S+)").expect("valid regex"));

    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_matches('"').to_string())
        .filter(|url| !url.is_empty())
}

/// Joins the public base URL and the webhook path into the URL registered
/// with the Bot API.
pub fn webhook_url(public_url: &str, webhook_path: &str) -> Result<String> {
    let joined = format!("{}{}", public_url.trim_end_matches('/'), webhook_path);
    let url = url::Url::parse(&joined).with_context(|| format!("Invalid webhook URL {}", joined))?;
    if url.scheme() != "https" {
        tracing::warn!("Webhook URL {} is not HTTPS, Telegram will reject it", url);
    }
    Ok(url.to_string())
}
