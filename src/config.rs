use anyhow::{anyhow, Result};
use std::env;

const DEFAULT_DB_PATH: &str = "queue.db";
const DEFAULT_DASHBOARD_URL: &str = "http://localhost:8080";
const DEFAULT_HTTP_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    /// Telegram user allowed to manage events. Zero means nobody is.
    pub admin_id: u64,
    pub dashboard_url: String,
    pub database_url: String,
    pub http_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("BOT_TOKEN")
            .map_err(|_| anyhow!("BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("BOT_TOKEN must be set"));
        }

        let admin_str = env::var("ADMIN_ID").unwrap_or_else(|_| "0".to_string());
        let admin_id = if admin_str.trim().is_empty() {
            0
        } else {
            admin_str.trim()
                .parse()
                .map_err(|_| anyhow!("Invalid ADMIN_ID"))?
        };

        let dashboard_url = env::var("DASHBOARD_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DASHBOARD_URL.to_string());

        Ok(Config {
            bot_token: token,
            admin_id,
            dashboard_url,
            database_url: database_url_from_env(),
            http_port: http_port_from_env()?,
        })
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_id != 0 && self.admin_id == user_id
    }
}

/// `DATABASE_URL` if set, otherwise a SQLite URL built from `DB_PATH`.
pub fn database_url_from_env() -> String {
    if let Some(url) = env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()) {
        return url;
    }

    let path = env::var("DB_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
    format!("sqlite:{path}")
}

pub fn http_port_from_env() -> Result<u16> {
    match env::var("PORT") {
        Ok(port_str) if !port_str.trim().is_empty() => port_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid PORT")),
        _ => Ok(DEFAULT_HTTP_PORT),
    }
}
