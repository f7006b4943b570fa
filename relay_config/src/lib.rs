use std::{net::IpAddr, path::Path, time::Duration};

use anyhow::{ensure, Context};
use config::{builder::DefaultState, ConfigBuilder, File, FileFormat};
use relay_models::{email_address::EmailAddress, Sensitive};
use serde::Deserialize;

/// Built-in defaults, always loaded first.
pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Environment variables and the config keys they override.
pub const ENVIRONMENT: &[(&str, &str)] = &[
    ("HOST", "http.host"),
    ("PORT", "http.port"),
    ("CORS_ORIGIN", "http.cors_origin"),
    ("REAL_IP_HEADER", "http.real_ip.header"),
    ("REAL_IP_SET_FROM", "http.real_ip.set_from"),
    ("RATE_LIMIT_WINDOW_MS", "rate_limit.window_ms"),
    ("RATE_LIMIT_MAX", "rate_limit.max"),
    ("SMTP_URL", "email.smtp_url"),
    ("SMTP_TIMEOUT_MS", "email.timeout_ms"),
    ("EMAIL_USER", "email.user"),
    ("EMAIL_PASS", "email.password"),
    ("HEALTH_CACHE_TTL_MS", "health.cache_ttl_ms"),
];

/// Load the config from the built-in defaults, the given files (later files
/// take precedence) and the process environment.
pub fn load(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    load_with_env(paths, |name| std::env::var(name).ok())
}

pub fn load_with_env(
    paths: &[impl AsRef<Path>],
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    let builder = config::Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    let builder = paths.iter().try_fold(builder, |builder, path| {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let source = File::from_str(&content, FileFormat::Toml);
        anyhow::Ok(builder.add_source(source))
    })?;

    let config: Config = apply_environment(builder, env)?
        .build()?
        .try_deserialize()
        .context("Failed to load config")?;
    config.validate().context("Invalid config")?;
    Ok(config)
}

fn apply_environment(
    builder: ConfigBuilder<DefaultState>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ConfigBuilder<DefaultState>> {
    ENVIRONMENT
        .iter()
        .try_fold(builder, |builder, &(name, key)| {
            let value = env(name).filter(|value| !value.is_empty());
            builder.set_override_option(key, value)
        })
        .context("Failed to apply environment variables")
}

/// Longest accepted duration setting. Timestamps are offset by these
/// durations, which is only possible up to `i64::MAX` milliseconds.
const MAX_DURATION_MS: u64 = i64::MAX as u64;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub rate_limit: RateLimitConfig,
    pub email: EmailConfig,
    pub health: HealthConfig,
}

impl Config {
    fn validate(&self) -> anyhow::Result<()> {
        let RateLimitConfig { window_ms, max } = self.rate_limit;
        ensure!(
            (1..=MAX_DURATION_MS).contains(&window_ms),
            "rate_limit.window_ms must be between 1 and {MAX_DURATION_MS}, got {window_ms}"
        );
        ensure!(max >= 1, "rate_limit.max must be at least 1");

        let timeout_ms = self.email.timeout_ms;
        ensure!(
            (1..=MAX_DURATION_MS).contains(&timeout_ms),
            "email.timeout_ms must be between 1 and {MAX_DURATION_MS}, got {timeout_ms}"
        );

        let cache_ttl_ms = self.health.cache_ttl_ms;
        ensure!(
            cache_ttl_ms <= MAX_DURATION_MS,
            "health.cache_ttl_ms must be at most {MAX_DURATION_MS}, got {cache_ttl_ms}"
        );

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Comma separated list of origins allowed to call the api.
    pub cors_origin: String,
    pub real_ip: Option<RealIpConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitConfig {
    pub window_ms: u64,
    pub max: u32,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub timeout_ms: u64,
    /// The authenticated relay account. Used as sender and recipient.
    pub user: EmailAddress,
    pub password: Sensitive<String>,
}

impl EmailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl_ms: u64,
}

impl HealthConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const NO_FILES: &[&str] = &[];

    fn load_env(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars = vars
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect::<HashMap<_, _>>();
        load_with_env(NO_FILES, |name| vars.get(name).cloned())
    }

    const CREDENTIALS: [(&str, &str); 2] = [
        ("EMAIL_USER", "relay@example.com"),
        ("EMAIL_PASS", "app-password"),
    ];

    #[test]
    fn defaults() {
        let config = load_env(&CREDENTIALS).unwrap();

        assert_eq!(config.http.host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.http.cors_origin, "http://localhost:5173");
        assert!(config.http.real_ip.is_none());
        assert_eq!(config.rate_limit.window(), Duration::from_secs(60));
        assert_eq!(config.rate_limit.max, 10);
        assert_eq!(config.email.smtp_url, "smtps://smtp.gmail.com:465");
        assert_eq!(config.email.timeout(), Duration::from_secs(10));
        assert_eq!(config.email.user.as_str(), "relay@example.com");
        assert_eq!(*config.email.password, "app-password");
        assert_eq!(config.health.cache_ttl(), Duration::from_secs(10));
    }

    #[test]
    fn environment_overrides() {
        let config = load_env(&[
            CREDENTIALS[0],
            CREDENTIALS[1],
            ("PORT", "8080"),
            ("CORS_ORIGIN", "https://example.com,https://www.example.com"),
            ("RATE_LIMIT_WINDOW_MS", "1000"),
            ("RATE_LIMIT_MAX", "3"),
            ("REAL_IP_HEADER", "X-Real-Ip"),
            ("REAL_IP_SET_FROM", "127.0.0.1"),
        ])
        .unwrap();

        assert_eq!(config.http.port, 8080);
        assert_eq!(
            config.http.cors_origin,
            "https://example.com,https://www.example.com"
        );
        assert_eq!(config.rate_limit.window(), Duration::from_secs(1));
        assert_eq!(config.rate_limit.max, 3);
        let real_ip = config.http.real_ip.unwrap();
        assert_eq!(real_ip.header, "X-Real-Ip");
        assert_eq!(real_ip.set_from, IpAddr::from([127, 0, 0, 1]));
    }

    #[test]
    fn empty_variables_are_ignored() {
        let config = load_env(&[CREDENTIALS[0], CREDENTIALS[1], ("PORT", "")]).unwrap();
        assert_eq!(config.http.port, 5000);
    }

    #[test]
    fn credentials_are_required() {
        assert!(load_env(&[]).is_err());
        assert!(load_env(&[CREDENTIALS[0]]).is_err());
        assert!(load_env(&[CREDENTIALS[1]]).is_err());
    }

    #[test]
    fn invalid_values() {
        assert!(load_env(&[("EMAIL_USER", "not-an-email"), CREDENTIALS[1]]).is_err());
        assert!(load_env(&[CREDENTIALS[0], CREDENTIALS[1], ("RATE_LIMIT_MAX", "many")]).is_err());
        assert!(load_env(&[CREDENTIALS[0], CREDENTIALS[1], ("HOST", "localhost")]).is_err());
    }

    #[test]
    fn rate_limit_bounds() {
        let with = |name: &str, value: &str| {
            load_env(&[CREDENTIALS[0], CREDENTIALS[1], (name, value)])
        };

        assert!(with("RATE_LIMIT_WINDOW_MS", "0").is_err());
        assert!(with("RATE_LIMIT_WINDOW_MS", "9223372036854775808").is_err());
        assert!(with("RATE_LIMIT_WINDOW_MS", "18446744073709551615").is_err());
        assert!(with("RATE_LIMIT_MAX", "0").is_err());

        let config = with("RATE_LIMIT_WINDOW_MS", "1").unwrap();
        assert_eq!(config.rate_limit.window(), Duration::from_millis(1));
        let config = with("RATE_LIMIT_MAX", "1").unwrap();
        assert_eq!(config.rate_limit.max, 1);
    }

    #[test]
    fn duration_bounds() {
        let with = |name: &str, value: &str| {
            load_env(&[CREDENTIALS[0], CREDENTIALS[1], (name, value)])
        };

        assert!(with("SMTP_TIMEOUT_MS", "0").is_err());
        assert!(with("HEALTH_CACHE_TTL_MS", "18446744073709551615").is_err());
        assert!(with("HEALTH_CACHE_TTL_MS", "0").is_ok());
    }

    #[test]
    fn missing_config_file() {
        let result = load_with_env(&["/nonexistent/relay.toml"], |_| None);
        assert!(result.is_err());
    }

    #[test]
    fn password_is_redacted() {
        let config = load_env(&CREDENTIALS).unwrap();
        assert!(!format!("{config:?}").contains("app-password"));
    }
}
