use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Proxy, Response, StatusCode};
use url::Url;

use super::models::{DeleteResult, Envelope, Tweet, User};
use super::oauth::OAuthSigner;
use crate::config::AppConfig;
use crate::credentials::Credentials;
use crate::sweep::Deleter;
use crate::{Error, Result};

const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";
const MAX_ERROR_BODY_CHARS: usize = 300;
/// Always requested: oldest-first ordering depends on it
const CREATED_AT_FIELD: &str = "created_at";

/// Signed client for the three endpoints a sweep needs:
/// identity lookup, recent tweets, and delete-by-id.
pub struct TwitterClient {
    client: Client,
    signer: OAuthSigner,
    base_url: String,
    page_size: u32,
    tweet_fields: Vec<String>,
}

impl TwitterClient {
    pub fn new(config: &AppConfig, credentials: Credentials) -> Result<Self> {
        let client = Self::build_client(config.api.request_timeout_secs, &config.api.proxy_url)?;

        Ok(Self {
            client,
            signer: OAuthSigner::new(credentials),
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size(),
            tweet_fields: requested_fields(&config.api.tweet_fields),
        })
    }

    /// Build HTTP client with optional proxy
    fn build_client(timeout_secs: u64, proxy_url: &Option<String>) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true);

        if let Some(ref proxy) = proxy_url {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for API requests");
        }

        builder.build().map_err(Error::Http)
    }

    /// Base URL plus `segments`, each escaped as a single path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("API base URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sign and send a request without a body
    async fn send(&self, method: Method, url: Url) -> Result<Response> {
        let authorization = self.signer.authorization_header(method.as_str(), &url);

        tracing::debug!("{} {}", method, url);

        let response = self
            .client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await?;

        Ok(response)
    }

    /// Resolve the authenticated user's id via `users/me`
    pub async fn get_user_id(&self) -> Result<String> {
        let url = self.endpoint(&["users", "me"])?;
        let response = self.send(Method::GET, url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response).await);
        }

        let envelope: Envelope<User> = response.json().await?;
        let user = envelope
            .data
            .ok_or_else(|| Error::Other("Identity response carried no user".to_string()))?;

        tracing::debug!(username = ?user.username, "Resolved authenticated user");
        Ok(user.id)
    }

    /// Fetch the most recent tweets of `user_id`, in the order the API returns them.
    ///
    /// A 429 is not an error: it yields an empty page so the caller can end the run
    /// cleanly. Any other non-success status is reported as `Error::Api`.
    pub async fn fetch_user_tweets(&self, user_id: &str) -> Result<Vec<Tweet>> {
        let mut url = self.endpoint(&["users", user_id, "tweets"])?;
        url.query_pairs_mut()
            .append_pair("max_results", &self.page_size.to_string())
            .append_pair("tweet.fields", &self.tweet_fields.join(","));

        let response = self.send(Method::GET, url).await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            match rate_limit_reset(response.headers()) {
                Some(reset) => tracing::warn!("Rate limit hit, window resets at {}", reset),
                None => tracing::warn!("Rate limit hit"),
            }
            return Ok(Vec::new());
        }

        if !status.is_success() {
            return Err(api_error(status, response).await);
        }

        let envelope: Envelope<Vec<Tweet>> = response.json().await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Delete one tweet. Never fails: any non-success is logged and reported as `false`.
    pub async fn delete_tweet(&self, tweet_id: &str) -> bool {
        let url = match self.endpoint(&["tweets", tweet_id]) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Failed to delete tweet {}: {}", tweet_id, e);
                return false;
            }
        };

        let response = match self.send(Method::DELETE, url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to delete tweet {}: {}", tweet_id, e);
                return false;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Failed to delete tweet {}. Status: {}", tweet_id, status);
            return false;
        }

        // An explicit `"deleted": false` overrides the 2xx status
        let confirmed = response
            .json::<Envelope<DeleteResult>>()
            .await
            .ok()
            .and_then(|envelope| envelope.data)
            .map(|result| result.deleted)
            .unwrap_or(true);

        if !confirmed {
            tracing::warn!("API refused to delete tweet {}", tweet_id);
        }
        confirmed
    }
}

#[async_trait::async_trait]
impl Deleter for TwitterClient {
    async fn delete(&self, id: &str) -> bool {
        self.delete_tweet(id).await
    }
}

async fn api_error(status: StatusCode, response: Response) -> Error {
    let body = response.text().await.unwrap_or_default();
    let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    Error::Api {
        status: status.as_u16(),
        message,
    }
}

/// `created_at` first, then the configured extras without duplicates
fn requested_fields(configured: &[String]) -> Vec<String> {
    let mut fields = vec![CREATED_AT_FIELD.to_string()];
    for field in configured {
        let field = field.trim();
        if !field.is_empty() && !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
    }
    fields
}

fn rate_limit_reset(headers: &HeaderMap) -> Option<chrono::DateTime<chrono::Utc>> {
    headers
        .get(RATE_LIMIT_RESET_HEADER)?
        .to_str()
        .ok()?
        .parse::<i64>()
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> Credentials {
        Credentials {
            api_key: "key".into(),
            api_secret: "secret".into(),
            access_token: "token".into(),
            access_token_secret: "token-secret".into(),
        }
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "https://api.example.com/2/".into();
        let client = TwitterClient::new(&config, test_credentials()).unwrap();

        assert_eq!(
            client.endpoint(&["users", "me"]).unwrap().as_str(),
            "https://api.example.com/2/users/me"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let mut config = AppConfig::default();
        config.api.base_url = "https://api.example.com/2".into();
        let client = TwitterClient::new(&config, test_credentials()).unwrap();

        let url = client.endpoint(&["tweets", "999?x=1"]).unwrap();
        assert_eq!(url.path(), "/2/tweets/999%3Fx=1");
        assert!(url.query().is_none());

        let url = client.endpoint(&["tweets", "../users/42"]).unwrap();
        assert_eq!(url.path(), "/2/tweets/..%2Fusers%2F42");
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let mut config = AppConfig::default();
        config.api.base_url = "http://127.0.0.1:8080".into();
        let client = TwitterClient::new(&config, test_credentials()).unwrap();

        assert_eq!(
            client.endpoint(&["users", "me"]).unwrap().as_str(),
            "http://127.0.0.1:8080/users/me"
        );
    }

    #[test]
    fn test_created_at_always_requested() {
        assert_eq!(requested_fields(&[]), vec!["created_at"]);
        assert_eq!(
            requested_fields(&["text".to_string(), "created_at".to_string(), " ".to_string()]),
            vec!["created_at", "text"]
        );
    }

    #[test]
    fn test_rate_limit_reset_header() {
        let mut headers = HeaderMap::new();
        assert!(rate_limit_reset(&headers).is_none());

        headers.insert(RATE_LIMIT_RESET_HEADER, "1700000000".parse().unwrap());
        assert_eq!(
            rate_limit_reset(&headers).unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );

        headers.insert(RATE_LIMIT_RESET_HEADER, "soon".parse().unwrap());
        assert!(rate_limit_reset(&headers).is_none());
    }
}
