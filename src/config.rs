//! Process configuration, read once from the environment at start-up.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use validator::Validate;

use crate::domain::cost::model::{TimeRange, DATE_FORMAT};

pub const DEFAULT_REGION: &str = "ca-central-1";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_REPORT_START: &str = "2025-04-12";
pub const DEFAULT_REPORT_END: &str = "2025-09-28";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsSettings {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub region: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_addr: String,
    pub log_dir: PathBuf,
    pub aws: AwsSettings,
    /// `None` disables the persistence path.
    pub database: Option<DatabaseSettings>,
    pub snapshot_path: Option<PathBuf>,
    pub report_window: TimeRange,
}

const DB_VARS: [&str; 4] = ["DB_HOST", "DB_USER", "DB_PASSWORD", "DB_NAME"];

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let aws = AwsSettings {
            access_key_id: get("AWS_ACCESS_KEY_ID"),
            secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            session_token: get("AWS_SESSION_TOKEN"),
            region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
        };

        let database = if DB_VARS.into_iter().all(|key| get(key).is_none()) {
            None
        } else {
            let require = |key: &str| {
                get(key).ok_or_else(|| anyhow!("{key} must be set when database persistence is configured"))
            };
            let port = match get("DB_PORT") {
                Some(raw) => raw
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("DB_PORT is not a valid port: {raw}"))?,
                None => DEFAULT_DB_PORT,
            };
            Some(DatabaseSettings {
                host: require("DB_HOST")?,
                port,
                user: require("DB_USER")?,
                password: require("DB_PASSWORD")?,
                name: require("DB_NAME")?,
            })
        };

        let start = parse_date(
            "AWSCOST_START_DATE",
            &get("AWSCOST_START_DATE").unwrap_or_else(|| DEFAULT_REPORT_START.to_string()),
        )?;
        let end = parse_date(
            "AWSCOST_END_DATE",
            &get("AWSCOST_END_DATE").unwrap_or_else(|| DEFAULT_REPORT_END.to_string()),
        )?;
        let report_window = TimeRange::new(start, end);
        report_window
            .validate()
            .context("AWSCOST_START_DATE must not be after AWSCOST_END_DATE")?;

        Ok(Self {
            server_addr: get("AWSCOST_SERVER_ADDR")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string()),
            log_dir: get("AWSCOST_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            aws,
            database,
            snapshot_path: get("AWSCOST_SNAPSHOT_PATH").map(PathBuf::from),
            report_window,
        })
    }
}

fn parse_date(key: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .with_context(|| format!("{key} is not a YYYY-MM-DD date: {raw}"))
}
