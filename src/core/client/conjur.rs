//! Conjur REST client.
//!
//! Endpoints used:
//!
//! - `POST /authn-jwt/{service_id}/{account}/authenticate` (form `jwt=...`)
//! - `POST /authn/{account}/{login}/authenticate` (API key as body)
//! - `GET /secrets?variable_ids={account}:variable:{id},...`
//!
//! Access tokens are sent base64-encoded as `Authorization: Token token="..."`.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode, Url};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::SecretStore;
use crate::core::auth::Strategy;
use crate::core::config::Connection;
use crate::core::types::{SecretId, SecretValues};
use crate::error::ClientError;

/// Conjur client bound to one account and authentication strategy.
pub struct Conjur {
    http: reqwest::Client,
    base: Url,
    account: String,
    strategy: Strategy,
    token: Option<Zeroizing<String>>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl Conjur {
    /// Create a client for `connection` that authenticates with `strategy`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` for an unusable base address and
    /// `ClientError::InvalidCertificate` for a malformed PEM certificate.
    pub fn new(connection: &Connection, strategy: Strategy) -> Result<Self, ClientError> {
        let base = Url::parse(&connection.url).map_err(|e| ClientError::InvalidUrl {
            url: connection.url.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: connection.url.clone(),
                reason: "not a base URL".to_string(),
            });
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("conjur-pipe/", env!("CARGO_PKG_VERSION")));
        if let Some(pem) = &connection.ssl_certificate {
            let cert = reqwest::Certificate::from_pem(pem.as_bytes())
                .map_err(|e| ClientError::InvalidCertificate(e.to_string()))?;
            builder = builder.add_root_certificate(cert);
        }

        Ok(Self {
            http: builder.build()?,
            base,
            account: connection.account.clone(),
            strategy,
            token: None,
        })
    }

    /// Whether an access token has been obtained.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Build an endpoint URL below the base, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                url: self.base.to_string(),
                reason: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorization(&self) -> Result<HeaderValue, ClientError> {
        let token = self.token.as_ref().ok_or(ClientError::NotAuthenticated)?;
        let mut value = HeaderValue::from_str(&format!("Token token=\"{}\"", token.as_str()))
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

#[async_trait]
impl SecretStore for Conjur {
    async fn authenticate(&mut self) -> Result<(), ClientError> {
        let response = match &self.strategy {
            Strategy::Jwt { token, service_id } => {
                let url = self.endpoint(&[
                    "authn-jwt",
                    service_id.as_str(),
                    self.account.as_str(),
                    "authenticate",
                ])?;
                debug!(url = %url, "authenticating with JWT");
                self.http
                    .post(url)
                    .form(&[("jwt", token.as_str())])
                    .send()
                    .await?
            }
            Strategy::ApiKey { store, url } => {
                let (login, mut api_key) = store.take(url)?.into_parts();
                let endpoint = self.endpoint(&[
                    "authn",
                    self.account.as_str(),
                    login.as_str(),
                    "authenticate",
                ])?;
                debug!(url = %endpoint, login = %login, "authenticating with API key");
                // The key moves into the request body without a copy. That
                // buffer is owned by reqwest and is not zeroized.
                let body = reqwest::Body::from(std::mem::take(&mut *api_key));
                self.http.post(endpoint).body(body).send().await?
            }
        };

        let response = check(response).await?;
        let raw = Zeroizing::new(response.bytes().await?.to_vec());
        if raw.is_empty() {
            return Err(ClientError::InvalidResponse(
                "empty access token".to_string(),
            ));
        }
        self.token = Some(Zeroizing::new(BASE64.encode(raw.as_slice())));

        trace!("access token obtained");
        Ok(())
    }

    async fn get_many(&self, ids: &[SecretId]) -> Result<SecretValues, ClientError> {
        if ids.is_empty() {
            return Ok(SecretValues::new());
        }

        let authorization = self.authorization()?;
        let qualified: Vec<String> = ids
            .iter()
            .map(|id| format!("{}:variable:{}", self.account, id))
            .collect();

        let mut url = self.endpoint(&["secrets"])?;
        url.query_pairs_mut()
            .append_pair("variable_ids", &qualified.join(","));

        debug!(count = ids.len(), "fetching secrets");
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await?;
        let response = check(response).await?;

        let mut body: HashMap<String, String> = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        let mut values = SecretValues::new();
        for (id, qualified_id) in ids.iter().zip(&qualified) {
            let value = body
                .remove(qualified_id)
                .ok_or_else(|| ClientError::MissingSecret(id.clone()))?;
            values.insert(id.clone(), Zeroizing::new(value));
        }

        debug!(count = values.len(), "secrets fetched");
        Ok(values)
    }
}

/// Turn a non-success response into a `ClientError`.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error.message)
        .unwrap_or_else(|_| {
            if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                text.trim().to_string()
            }
        });

    debug!(status = status.as_u16(), "secret store request failed");
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Unauthorized {
            status: status.as_u16(),
            message,
        }),
        _ => Err(ClientError::Status {
            status: status.as_u16(),
            message,
        }),
    }
}
