//! Fire-and-forget check for a newer released version.
//!
//! Strictly fail-open: a bounded timeout, and every failure (network,
//! status, body shape) collapses to `None`. Nothing here may ever affect
//! parsing or session behavior.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_RELEASES_URL: &str =
    "https://api.github.com/repos/quizdesk/quizdesk/releases/latest";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Queries a releases endpoint for the latest version tag.
#[derive(Debug, Clone)]
pub struct VersionCheck {
    url: String,
}

impl Default for VersionCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionCheck {
    #[must_use]
    pub fn new() -> Self {
        Self {
            url: DEFAULT_RELEASES_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Latest release tag, or `None` on any failure.
    pub async fn latest(&self) -> Option<String> {
        let client = match Client::builder().timeout(REQUEST_TIMEOUT).build() {
            Ok(client) => client,
            Err(err) => {
                debug!(error = %err, "version check client build failed");
                return None;
            }
        };

        let response = match client
            .get(&self.url)
            .header("User-Agent", "quizdesk")
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, "version check request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "version check rejected");
            return None;
        }

        match response.json::<Release>().await {
            Ok(release) => Some(release.tag_name),
            Err(err) => {
                debug!(error = %err, "version check body malformed");
                None
            }
        }
    }
}
