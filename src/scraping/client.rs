use crate::config::Config;
use crate::error::ClientError;
use crate::scraping::constants;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(constants::ACCEPT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpClient {
            inner: builder.build()?,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let response = self
            .inner
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ClientError::Fetch {
                url: url.to_string(),
                source,
            })?;

        decode(url, response).await
    }

    pub async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Fetch {
                url: url.to_string(),
                source,
            })?;

        decode(url, response).await
    }
}

async fn decode<T: DeserializeOwned>(url: Url, response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let body = response.bytes().await.map_err(|source| ClientError::Fetch {
        url: url.to_string(),
        source,
    })?;

    serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Appends `segments` to `base`, percent-encoding each one. Empty and dot
/// segments are refused, url would otherwise drop them silently.
pub fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
        return Err(ClientError::InvalidEndpoint(format!("{base} + {bad:?}")));
    }

    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidEndpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
