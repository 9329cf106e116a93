//! Sheet Text Fetching
//!
//! The network seam for the fallback extraction path. The harvester only
//! needs "URL in, text out"; tests stub it, production uses reqwest over
//! rustls behind `smol::unblock`.

use crate::HarvestError;

/// Retrieves raw stylesheet text for access-restricted sheets.
pub trait SheetFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, HarvestError>;
}

/// HTTP fetcher backed by a blocking reqwest client, moved off the event
/// loop with `smol::unblock`.
#[derive(Debug, Clone, Default)]
pub struct HttpSheetFetcher {
    client: reqwest::blocking::Client,
}

impl HttpSheetFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SheetFetcher for HttpSheetFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, HarvestError> {
        let client = self.client.clone();
        let url = url.to_string();

        smol::unblock(move || {
            let response = client
                .get(&url)
                .send()
                .map_err(|e| HarvestError::Network {
                    url: url.clone(),
                    message: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(HarvestError::Http {
                    status: status.as_u16(),
                    url: url.clone(),
                });
            }

            response.text().map_err(|e| HarvestError::Network {
                url: url.clone(),
                message: e.to_string(),
            })
        })
        .await
    }
}
