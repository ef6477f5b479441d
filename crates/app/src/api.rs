use std::time::Duration;

use api_types::{
    budget::{BudgetItemRecord, BudgetRecord},
    draw::DrawRequestRecord,
    snapshot::Snapshot,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::settings::Http;

/// Client for the budget and draw services.
#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    client: Client,
    budgets_url: String,
    draws_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
}

fn url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl ApiClient {
    pub(crate) fn new(settings: &Http) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            budgets_url: settings.budgets_url.clone(),
            draws_url: settings.draws_url.clone(),
        })
    }

    async fn get_json<TResp: DeserializeOwned>(&self, url: String) -> Result<TResp, ApiError> {
        tracing::debug!("GET {url}");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<TResp>().await?);
        }

        let message = match resp.json::<ErrorBody>().await {
            Ok(err) => err.error,
            Err(_) => "server error".to_string(),
        };
        Err(ApiError::Server { status, message })
    }

    pub(crate) async fn budgets(&self) -> Result<Vec<BudgetRecord>, ApiError> {
        self.get_json(url(&self.budgets_url, "/budgets")).await
    }

    pub(crate) async fn budget_items(&self) -> Result<Vec<BudgetItemRecord>, ApiError> {
        self.get_json(url(&self.budgets_url, "/items")).await
    }

    pub(crate) async fn draw_requests(&self) -> Result<Vec<DrawRequestRecord>, ApiError> {
        self.get_json(url(&self.draws_url, "/requests")).await
    }

    /// Fetch the three collections concurrently. Fails as soon as one fails.
    pub(crate) async fn snapshot(&self) -> Result<Snapshot, ApiError> {
        let (budgets, items, draw_requests) =
            tokio::try_join!(self.budgets(), self.budget_items(), self.draw_requests())?;

        Ok(Snapshot {
            budgets,
            items,
            draw_requests,
        })
    }
}
