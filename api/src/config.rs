use std::env;
use std::str::FromStr;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Root directory for uploaded PDFs
    pub storage_root: String,
    /// Lifetime of issued bearer tokens
    pub token_ttl_hours: i64,
    /// Server-side secret mixed into password hashes
    pub password_pepper: String,
    /// Initial administrator created when the users table is empty
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub siigo: SiigoConfig,
    pub solar: SolarWindow,
}

#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Siigo accounting API credentials
#[derive(Clone)]
pub struct SiigoConfig {
    pub base_url: String,
    pub username: Option<String>,
    pub access_key: Option<String>,
    /// Sent as the `Partner-Id` header
    pub partner_id: String,
    pub token_refresh_minutes: u64,
}

impl SiigoConfig {
    /// Check if Siigo credentials are configured
    pub fn enabled(&self) -> bool {
        self.username.is_some() && self.access_key.is_some()
    }
}

/// Daylight window used for the dashboard generation curve, in decimal hours
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolarWindow {
    pub sunrise_hour: f64,
    pub sunset_hour: f64,
}

impl Default for SolarWindow {
    fn default() -> Self {
        Self {
            sunrise_hour: 6.0,
            sunset_hour: 18.0,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let defaults = SolarWindow::default();

        Ok(Self {
            database_url,
            port: parse_or("PORT", 8080),
            storage_root: env::var("STORAGE_ROOT").unwrap_or_else(|_| "./storage".to_string()),
            token_ttl_hours: parse_or("TOKEN_TTL_HOURS", 24),
            password_pepper: env::var("PASSWORD_PEPPER")
                .unwrap_or_else(|_| "dev-pepper-not-for-production".to_string()),
            bootstrap_admin: match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
                (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                    Some(BootstrapAdmin { email, password })
                }
                _ => None,
            },
            siigo: SiigoConfig {
                base_url: env::var("SIIGO_BASE_URL")
                    .unwrap_or_else(|_| "https://api.siigo.com".to_string()),
                username: env::var("SIIGO_USERNAME").ok().filter(|v| !v.is_empty()),
                access_key: env::var("SIIGO_ACCESS_KEY").ok().filter(|v| !v.is_empty()),
                partner_id: env::var("SIIGO_PARTNER_ID")
                    .unwrap_or_else(|_| "solar-erp".to_string()),
                token_refresh_minutes: parse_or("SIIGO_TOKEN_REFRESH_MINUTES", 720),
            },
            solar: SolarWindow {
                sunrise_hour: parse_or("SOLAR_SUNRISE_HOUR", defaults.sunrise_hour),
                sunset_hour: parse_or("SOLAR_SUNSET_HOUR", defaults.sunset_hour),
            },
        })
    }
}
