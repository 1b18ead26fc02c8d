use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Desktop browser UA; several storefronts serve a stripped page to unknown agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional_path = |var: &str| -> Option<PathBuf> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("MENUSCRAPE_ENV", "development"))?;
    let bind_addr = parse_addr("MENUSCRAPE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("MENUSCRAPE_LOG_LEVEL", "info");
    let output_dir = PathBuf::from(or_default("MENUSCRAPE_OUTPUT_DIR", "."));
    let static_dir = PathBuf::from(or_default("MENUSCRAPE_STATIC_DIR", "./public"));
    let profiles_path = optional_path("MENUSCRAPE_PROFILES_PATH");
    let debug_dir = optional_path("MENUSCRAPE_DEBUG_DIR");

    let page_load_timeout_secs = parse_secs("MENUSCRAPE_PAGE_LOAD_TIMEOUT_SECS", "60")?;
    let selector_timeout_secs = parse_secs("MENUSCRAPE_SELECTOR_TIMEOUT_SECS", "30")?;
    let request_timeout_secs = parse_secs("MENUSCRAPE_REQUEST_TIMEOUT_SECS", "300")?;
    let user_agent = or_default("MENUSCRAPE_USER_AGENT", DEFAULT_USER_AGENT);
    let fetch_max_retries = parse_u32("MENUSCRAPE_FETCH_MAX_RETRIES", "0")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        output_dir,
        static_dir,
        profiles_path,
        debug_dir,
        page_load_timeout_secs,
        selector_timeout_secs,
        request_timeout_secs,
        user_agent,
        fetch_max_retries,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MENUSCRAPE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}
