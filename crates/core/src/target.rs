//! Target host resolution.
//!
//! A run's host comes from, in order: an explicit per-run override, the
//! host stored on the task, and finally the configured default. JMeter
//! plans additionally need the host split into protocol, host and port.

use url::Url;

/// Pick the host for one run from the override and the task's own host.
///
/// Returns an empty string when neither is set; callers then fall back to
/// the configured default with [`effective_host`].
pub fn pick_target_host(override_host: Option<&str>, stored: Option<&str>) -> String {
    override_host
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .or_else(|| stored.map(str::trim))
        .unwrap_or_default()
        .to_string()
}

/// The picked host, or the default when nothing was picked.
pub fn effective_host<'a>(picked: &'a str, default: &'a str) -> &'a str {
    let picked = picked.trim();
    if picked.is_empty() {
        default.trim()
    } else {
        picked
    }
}

/// A target host split into the parts JMeter plans consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetHost {
    pub host: String,
    pub port: String,
    pub protocol: String,
}

/// Split `input` (or `fallback` when blank) into protocol, host and port.
///
/// Accepts bare `host`, `host:port`, and URLs with an optional path. The
/// protocol defaults to `http`. A missing port becomes `443` for `https`
/// and `80` otherwise; a port that is not a number becomes `80`.
pub fn parse_target_host(input: &str, fallback: &str) -> TargetHost {
    let target = effective_host(input, fallback);

    let mut protocol = "http".to_string();
    let mut host_port = target.to_string();

    if let Some((scheme, rest)) = target.split_once("://") {
        match Url::parse(target) {
            Ok(url) => {
                protocol = url.scheme().to_string();
                if let Some(host) = url.host_str() {
                    host_port = match url.port() {
                        Some(port) => format!("{host}:{port}"),
                        None => host.to_string(),
                    };
                } else if !url.path().is_empty() {
                    host_port = url.path().trim_start_matches('/').to_string();
                }
            }
            Err(_) => {
                // e.g. a non-numeric port; keep what follows the scheme.
                if !scheme.is_empty() {
                    protocol = scheme.to_ascii_lowercase();
                }
                host_port = rest.to_string();
            }
        }
    }

    if let Some((before_path, _)) = host_port.split_once('/') {
        host_port = before_path.to_string();
    }

    let (host, port) = match split_host_port(&host_port) {
        Some((host, port)) => (host.to_string(), port.to_string()),
        None => (host_port.clone(), String::new()),
    };

    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .map(str::to_string)
        .unwrap_or(host);

    let port = if port.is_empty() {
        let default_port = if protocol == "https" { "443" } else { "80" };
        default_port.to_string()
    } else if port.parse::<u16>().is_err() {
        "80".to_string()
    } else {
        port
    };

    TargetHost {
        host,
        port,
        protocol,
    }
}

/// Split `host:port`, honouring bracketed IPv6 literals.
///
/// Returns `None` when there is no port separator or the host part is an
/// unbracketed IPv6 address.
fn split_host_port(host_port: &str) -> Option<(&str, &str)> {
    if let Some(rest) = host_port.strip_prefix('[') {
        let (host, after) = rest.split_once(']')?;
        let port = after.strip_prefix(':')?;
        return Some((host, port));
    }

    let (host, port) = host_port.rsplit_once(':')?;
    if host.contains(':') {
        return None;
    }
    Some((host, port))
}
