//! HTTP-backed user directory.

use crate::directory::{parse_users, User, UserDirectory};
use crate::error::{Result, UserlookError};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Public collection queried when no endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

/// Query parameter carrying the "name contains" filter.
const NAME_FILTER_PARAM: &str = "name_like";

/// User directory served by a JSON collection endpoint.
///
/// Issues `GET <endpoint>?name_like=<filter>` with no authentication, custom headers or
/// body, and decodes the response as an array of [`User`] records.
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpUserDirectory {
    /// Create a directory client for `endpoint` with a per-request timeout.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| UserlookError::network(format!("failed to build client: {err}")))?;
        Ok(Self { client, endpoint })
    }

    /// The collection endpoint without any filter applied.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the request URL for `filter`, query-escaping it.
    pub fn request_url(&self, filter: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(NAME_FILTER_PARAM, filter);
        url
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn fetch_users(&self, filter: &str) -> Result<Vec<User>> {
        let url = self.request_url(filter);
        log::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UserlookError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        parse_users(&body)
    }
}
