use serde::Serialize;
use tracing::trace;
use xjob_model::{ACCESS_TOKEN_HEADER, CallbackParam, RegistryParam, ReturnT};

use crate::{config::AdminConfig, errors::DiscoverError};

const REGISTRY: &str = "/api/registry";
const REGISTRY_REMOVE: &str = "/api/registryRemove";
const CALLBACK: &str = "/api/callback";

/// HTTP client for the scheduler's executor-facing API.
#[derive(Clone, Debug)]
pub struct AdminClient {
    http: reqwest::Client,
    base: String,
    token: String,
}

impl AdminClient {
    pub fn new(cfg: &AdminConfig) -> Result<Self, DiscoverError> {
        let http = reqwest::Client::builder().timeout(cfg.timeout()).build()?;
        Ok(Self {
            http,
            base: cfg.admin_address.trim_end_matches('/').to_string(),
            token: cfg.access_token.clone(),
        })
    }

    pub async fn registry(&self, param: &RegistryParam) -> Result<ReturnT, DiscoverError> {
        self.post(REGISTRY, param).await
    }

    pub async fn registry_remove(&self, param: &RegistryParam) -> Result<ReturnT, DiscoverError> {
        self.post(REGISTRY_REMOVE, param).await
    }

    pub async fn callback(&self, param: &CallbackParam) -> Result<ReturnT, DiscoverError> {
        self.post(CALLBACK, param).await
    }

    async fn post<B: Serialize>(&self, action: &str, body: &B) -> Result<ReturnT, DiscoverError> {
        let url = format!("{}{}", self.base, action);
        trace!(%url, "posting to scheduler");

        let response = self
            .http
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, &self.token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let ret: ReturnT = serde_json::from_str(&body).map_err(|e| {
            DiscoverError::InvalidResponse(format!(
                "failed to parse response: {e}, status: {status}, body: {body}"
            ))
        })?;

        if !ret.is_success() {
            return Err(DiscoverError::Rejected(format!("code {}: {}", ret.code, ret.msg)));
        }
        Ok(ret)
    }
}
