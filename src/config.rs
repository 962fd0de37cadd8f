// src/config.rs
use std::{collections::BTreeMap, env, fmt::Display, net::IpAddr, str::FromStr};

use tracing::{info, warn};

use crate::page::Locale;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Origin baked into generated links. Taken from the `Host` header when unset.
    pub public_origin: Option<String>,
    pub landing_locale: Locale,
    pub landing_hearts: bool,
    pub dedicated_locale: Locale,
    /// slug -> display name, served without a token.
    pub dedicated_pages: BTreeMap<String, String>,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            public_origin: None,
            landing_locale: Locale::Bulgarian,
            landing_hearts: false,
            dedicated_locale: Locale::English,
            dedicated_pages: parse_pages("bailey=Bailey"),
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: try_load("BIND_ADDR", defaults.bind_addr),
            port: try_load("PORT", defaults.port),
            public_origin: env::var("PUBLIC_ORIGIN")
                .ok()
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty()),
            landing_locale: try_load("LANDING_LOCALE", defaults.landing_locale),
            landing_hearts: try_load("LANDING_HEARTS", defaults.landing_hearts),
            dedicated_locale: try_load("DEDICATED_LOCALE", defaults.dedicated_locale),
            dedicated_pages: env::var("DEDICATED_PAGES")
                .map(|raw| parse_pages(&raw))
                .unwrap_or(defaults.dedicated_pages),
            request_timeout_secs: try_load("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
        }
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}, using default: {default:?}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default:?}");
            default
        }
    }
}

/// `slug=Name,slug=Name`. Slugs are lowercased; malformed entries are skipped.
pub fn parse_pages(raw: &str) -> BTreeMap<String, String> {
    raw.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(|entry| {
            let parsed = entry
                .split_once('=')
                .map(|(slug, name)| (slug.trim().to_lowercase(), name.trim().to_string()))
                .filter(|(slug, name)| {
                    !slug.is_empty()
                        && !name.is_empty()
                        && slug
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
                });
            if parsed.is_none() {
                warn!("Ignoring malformed DEDICATED_PAGES entry '{entry}'");
            }
            parsed
        })
        .collect()
}
