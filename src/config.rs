// file: src/config.rs
// description: application configuration from .env, environment and optional toml
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_PATH: &str = "wp-json/wp/v2";

const ENV_KEYS: &[&str] = &[
    "WP_URL",
    "WP_USER",
    "WP_APP_PASSWORD",
    "WATCH_FOLDER",
    "PUBLISHED_FOLDER",
    "WP_API_PATH",
    "READINESS_ATTEMPTS",
    "READINESS_INTERVAL_MS",
    "CATEGORY_TIMEOUT_SECS",
    "POST_TIMEOUT_SECS",
    "MAX_CONCURRENT",
    "EVENT_BUFFER",
    "WATCH_POLL_INTERVAL_MS",
];

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_path: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub app_password: String,
    pub category_timeout_secs: u64,
    pub post_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchConfig {
    pub watch_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub readiness_attempts: u32,
    pub readiness_interval_ms: u64,
    pub max_concurrent: usize,
    pub event_buffer: usize,
    pub poll_interval_ms: Option<u64>,
}

impl WatchConfig {
    pub fn readiness_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_interval_ms)
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_ms.map(Duration::from_millis)
    }

    /// Defaults for everything but the two directories.
    pub fn for_dirs(watch_dir: PathBuf, archive_dir: PathBuf) -> Self {
        Self {
            watch_dir,
            archive_dir,
            readiness_attempts: 10,
            readiness_interval_ms: 500,
            max_concurrent: 4,
            event_buffer: 256,
            poll_interval_ms: None,
        }
    }
}

/// Settings as read from the environment, before validation.
/// Keys match the environment variable names, lower-cased.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSettings {
    pub wp_url: Option<String>,
    pub wp_user: Option<String>,
    pub wp_app_password: Option<String>,
    pub watch_folder: Option<String>,
    pub published_folder: Option<String>,
    pub wp_api_path: Option<String>,
    pub readiness_attempts: Option<u32>,
    pub readiness_interval_ms: Option<u64>,
    pub category_timeout_secs: Option<u64>,
    pub post_timeout_secs: Option<u64>,
    pub max_concurrent: Option<usize>,
    pub event_buffer: Option<usize>,
    pub watch_poll_interval_ms: Option<u64>,
}

impl Config {
    /// Reads `.env` (or `env_file`), then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>, env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(file) => {
                dotenvy::from_path(file).map_err(|e| {
                    PipelineError::Config(format!(
                        "Failed to read env file {}: {}",
                        file.display(),
                        e
                    ))
                })?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let env: config::Map<String, String> = std::env::vars()
            .filter(|(key, _)| ENV_KEYS.contains(&key.as_str()))
            .collect();
        builder = builder.add_source(
            config::Environment::default()
                .source(Some(env))
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let raw: RawSettings = settings
            .try_deserialize()
            .map_err(|e| PipelineError::InvalidConfig(vec![e.to_string()]))?;

        Self::from_settings(raw)
    }

    /// Validates every setting, creating the folders when missing, and reports
    /// all problems at once.
    pub fn from_settings(raw: RawSettings) -> Result<Self> {
        let mut errors = Vec::new();

        let base_url = required(&raw.wp_url, "WP_URL", &mut errors);
        if let Some(url) = &base_url
            && let Err(e) = Validator::validate_url(url)
        {
            errors.push(format!("WP_URL: {}", validation_message(e)));
        }

        let username = required(&raw.wp_user, "WP_USER", &mut errors);
        let app_password = required(&raw.wp_app_password, "WP_APP_PASSWORD", &mut errors);

        let watch_dir = required(&raw.watch_folder, "WATCH_FOLDER", &mut errors)
            .and_then(|dir| prepare_dir(&dir, "WATCH_FOLDER", &mut errors));
        let archive_dir = required(&raw.published_folder, "PUBLISHED_FOLDER", &mut errors)
            .and_then(|dir| prepare_dir(&dir, "PUBLISHED_FOLDER", &mut errors));

        if let (Some(watch), Some(archive)) = (&watch_dir, &archive_dir)
            && watch == archive
        {
            errors.push("WATCH_FOLDER and PUBLISHED_FOLDER must be different folders".to_string());
        }

        let readiness_attempts = raw.readiness_attempts.unwrap_or(10);
        let readiness_interval_ms = raw.readiness_interval_ms.unwrap_or(500);
        let category_timeout_secs = raw.category_timeout_secs.unwrap_or(10);
        let post_timeout_secs = raw.post_timeout_secs.unwrap_or(30);
        let max_concurrent = raw.max_concurrent.unwrap_or(4);
        let event_buffer = raw.event_buffer.unwrap_or(256);

        for (name, value) in [
            ("READINESS_ATTEMPTS", readiness_attempts as u64),
            ("READINESS_INTERVAL_MS", readiness_interval_ms),
            ("CATEGORY_TIMEOUT_SECS", category_timeout_secs),
            ("POST_TIMEOUT_SECS", post_timeout_secs),
            ("MAX_CONCURRENT", max_concurrent as u64),
            ("EVENT_BUFFER", event_buffer as u64),
            ("WATCH_POLL_INTERVAL_MS", raw.watch_poll_interval_ms.unwrap_or(1)),
        ] {
            if let Err(e) = Validator::validate_positive(name, value) {
                errors.push(validation_message(e));
            }
        }

        match (base_url, username, app_password, watch_dir, archive_dir) {
            (Some(base_url), Some(username), Some(app_password), Some(watch_dir), Some(archive_dir))
                if errors.is_empty() =>
            {
                Ok(Self {
                    api: ApiConfig {
                        base_url,
                        api_path: raw
                            .wp_api_path
                            .unwrap_or_else(|| DEFAULT_API_PATH.to_string()),
                        username,
                        app_password,
                        category_timeout_secs,
                        post_timeout_secs,
                    },
                    watch: WatchConfig {
                        watch_dir,
                        archive_dir,
                        readiness_attempts,
                        readiness_interval_ms,
                        max_concurrent,
                        event_buffer,
                        poll_interval_ms: raw.watch_poll_interval_ms,
                    },
                })
            }
            _ => Err(PipelineError::InvalidConfig(errors)),
        }
    }
}

fn required(value: &Option<String>, name: &str, errors: &mut Vec<String>) -> Option<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => {
            errors.push(format!("{} is not set", name));
            None
        }
    }
}

fn prepare_dir(dir: &str, name: &str, errors: &mut Vec<String>) -> Option<PathBuf> {
    match Validator::ensure_directory(Path::new(dir)) {
        Ok(path) => Some(path),
        Err(e) => {
            errors.push(format!("{}: {}", name, validation_message(e)));
            None
        }
    }
}

fn validation_message(err: PipelineError) -> String {
    match err {
        PipelineError::Validation(message) => message,
        other => other.to_string(),
    }
}
