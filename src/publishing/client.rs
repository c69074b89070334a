// file: src/publishing/client.rs
// description: WordPress REST API client for post creation and category listing
// reference: https://developer.wordpress.org/rest-api/reference/

use crate::config::ApiConfig;
use crate::error::{ApiError, PipelineError, Result};
use crate::models::{Category, CreatedPost, NewPost};
use crate::publishing::PublishingApi;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const CONNECTION_CHECK_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_MESSAGE_LEN: usize = 500;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Outcome of the startup credentials check.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Unauthorized,
    Unexpected(u16),
    Unreachable(ApiError),
}

#[derive(Clone)]
pub struct WordPressClient {
    client: Client,
    api_root: Url,
    username: String,
    app_password: String,
    category_timeout: Duration,
    post_timeout: Duration,
}

impl WordPressClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let api_root = api_root(&config.base_url, &config.api_path)?;
        let client = Client::builder()
            .user_agent(concat!("md_autopost/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_root,
            username: config.username.clone(),
            app_password: config.app_password.clone(),
            category_timeout: Duration::from_secs(config.category_timeout_secs),
            post_timeout: Duration::from_secs(config.post_timeout_secs),
        })
    }

    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    fn endpoint(&self, name: &str) -> std::result::Result<Url, ApiError> {
        self.api_root
            .join(name)
            .map_err(|e| ApiError::Transport(format!("Invalid endpoint {}: {}", name, e)))
    }

    /// Lists one post to confirm the site is reachable and the credentials work.
    pub async fn check_connection(&self) -> ConnectionStatus {
        let url = match self.endpoint("posts") {
            Ok(url) => url,
            Err(e) => return ConnectionStatus::Unreachable(e),
        };

        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.app_password))
            .query(&[("per_page", "1")])
            .timeout(CONNECTION_CHECK_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status() == StatusCode::OK => ConnectionStatus::Connected,
            Ok(resp) if resp.status() == StatusCode::UNAUTHORIZED => ConnectionStatus::Unauthorized,
            Ok(resp) => ConnectionStatus::Unexpected(resp.status().as_u16()),
            Err(e) => ConnectionStatus::Unreachable(e.into()),
        }
    }
}

impl PublishingApi for WordPressClient {
    async fn list_categories(&self) -> std::result::Result<Vec<Category>, ApiError> {
        let url = self.endpoint("categories")?;
        debug!("Fetching categories from {}", url);

        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.app_password))
            .query(&[("per_page", "100"), ("orderby", "name"), ("order", "asc")])
            .timeout(self.category_timeout)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: extract_message(&body),
            });
        }

        Ok(response.json::<Vec<Category>>().await?)
    }

    async fn create_post(&self, post: &NewPost) -> std::result::Result<CreatedPost, ApiError> {
        let url = self.endpoint("posts")?;
        debug!("Creating post '{}' at {}", post.title, url);

        let response = self
            .client
            .post(url)
            .basic_auth(&self.username, Some(&self.app_password))
            .json(post)
            .timeout(self.post_timeout)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: extract_message(&body),
            });
        }

        // the post exists from here on; an unreadable body must not turn into a retry
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<CreatedPost>(&body) {
            Ok(created) => Ok(created),
            Err(e) => {
                warn!("Post '{}' was created but the response could not be read: {}", post.title, e);
                Ok(CreatedPost {
                    id: None,
                    link: String::new(),
                })
            }
        }
    }
}

/// `{base}/{path}/`, with the trailing slash `Url::join` needs.
fn api_root(base_url: &str, api_path: &str) -> Result<Url> {
    let base = base_url.trim_end_matches('/');
    let path = api_path.trim_matches('/');
    let root = if path.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}/", base, path)
    };

    Url::parse(&root).map_err(|e| PipelineError::Config(format!("Invalid API root {}: {}", root, e)))
}

/// The `message` field of a WordPress error body, else the raw body text.
fn extract_message(body: &str) -> Option<String> {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = serde_json::from_str::<ErrorBody>(body)
    {
        return Some(message);
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_MESSAGE_LEN).collect())
    }
}
