//! HTTP accessor for the qLog REST API.
//!
//! Every request leaves through [`ApiClient::request`], which attaches the
//! session credentials. Callers only supply a path and, where needed, a body.

use reqwest::header::COOKIE;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use url::{form_urlencoded, Url};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::routing::{Filters, ViewState};
use crate::types::{
    EnabledModulesUpdate, LogEntry, ModuleMetadata, ModuleStatusResponse, SavedView, ServerInfo,
    Stats,
};

/// API client bound to one dashboard origin
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session_cookie: Option<String>,
    basic_auth: Option<(String, Option<String>)>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base_url is not an origin: {}",
                config.base_url
            )));
        }

        let timeout_secs = config.timeout_seconds.unwrap_or(30);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("qlog-dashboard/", env!("CARGO_PKG_VERSION")))
            // cookies issued by the server (login) are replayed automatically
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url,
            session_cookie: config.session_cookie.clone().filter(|c| !c.is_empty()),
            basic_auth: config
                .username
                .clone()
                .filter(|u| !u.is_empty())
                .map(|u| (u, config.password.clone())),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/api/logs?limit=10`.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Request builder with credentials attached.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let mut builder = self.client.request(method, self.url(path)?);

        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some((username, password)) = &self.basic_auth {
            builder = builder.basic_auth(username, password.as_ref());
        }

        Ok(builder)
    }

    async fn send(&self, path: &str, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(path, status = status.as_u16(), "api response");

        if !status.is_success() {
            return Err(Error::Api {
                status,
                path: path.to_string(),
            });
        }
        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path)?;
        let response = self.send(path, builder).await?;
        Ok(response.json().await?)
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path)?.json(body);
        let response = self.send(path, builder).await?;
        Ok(response.json().await?)
    }

    pub async fn server_info(&self) -> Result<ServerInfo> {
        self.get_json("/api/server/info").await
    }

    pub async fn stats(&self) -> Result<Stats> {
        self.get_json("/api/stats").await
    }

    pub async fn logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>> {
        let path = format!("/api/logs?{}", query.to_query_string());
        // the server answers `null` for an empty table
        let logs: Option<Vec<LogEntry>> = self.get_json(&path).await?;
        Ok(logs.unwrap_or_default())
    }

    pub async fn view(&self, id: &str) -> Result<SavedView> {
        let path = format!("/api/views/{}", urlencoding::encode(id));
        self.get_json(&path).await
    }

    /// `device_type -> enabled`
    pub async fn module_status(&self) -> Result<BTreeMap<String, bool>> {
        let status: ModuleStatusResponse = self.get_json("/api/modules").await?;
        Ok(status.into_map())
    }

    /// `device_type -> metadata`
    pub async fn module_metadata(&self) -> Result<BTreeMap<String, ModuleMetadata>> {
        self.get_json("/api/module-metadata").await
    }

    pub async fn put_enabled_modules(
        &self,
        enabled_modules: BTreeMap<String, bool>,
    ) -> Result<serde_json::Value> {
        self.put_json("/api/modules", &EnabledModulesUpdate { enabled_modules })
            .await
    }
}

/// Query for `/api/logs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub limit: usize,
    pub offset: Option<usize>,
    pub filters: Option<Filters>,
}

impl LogQuery {
    /// Current page of the log list.
    pub fn from_state(view: &ViewState, filters: &Filters) -> Self {
        Self {
            limit: view.page_size,
            offset: Some(view.offset()),
            filters: Some(filters.clone()),
        }
    }

    /// Newest `limit` rows, unfiltered.
    pub fn recent(limit: usize) -> Self {
        Self {
            limit,
            offset: None,
            filters: None,
        }
    }

    /// The explicit date span is only sent for a `custom` range; any other
    /// range is sent as `date_range` and the span is ignored.
    pub fn to_query_string(&self) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("limit", &self.limit.to_string());
        if let Some(offset) = self.offset {
            params.append_pair("offset", &offset.to_string());
        }

        if let Some(filters) = &self.filters {
            if let Some(severity) = filters.severity {
                params.append_pair("severity", &severity.to_string());
            }
            for (key, value) in [
                ("device", &filters.device),
                ("device_type", &filters.device_type),
                ("event_type", &filters.event_type),
            ] {
                if !value.is_empty() {
                    params.append_pair(key, value);
                }
            }

            match (&filters.date_range, &filters.date_span) {
                (Some(range), Some(span)) if range == "custom" => {
                    params.append_pair("date_from", span.from());
                    params.append_pair("date_to", span.to());
                }
                (Some(range), _) if !range.is_empty() => {
                    params.append_pair("date_range", range);
                }
                _ => {}
            }

            if !filters.search.is_empty() {
                params.append_pair("search", &filters.search);
            }
        }

        params.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Severity;
    use crate::routing::DateSpan;

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new(&ClientConfig::default()).unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:8080/");
        assert_eq!(
            client.url("/api/logs?limit=10").unwrap().as_str(),
            "http://127.0.0.1:8080/api/logs?limit=10"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(ApiClient::new(&config), Err(Error::Url(_))));

        let config = ClientConfig {
            base_url: "mailto:ops@example.com".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(ApiClient::new(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_credentials_on_request() {
        let config = ClientConfig {
            session_cookie: Some("session=abc123".to_string()),
            username: Some("admin".to_string()),
            password: Some("pw".to_string()),
            ..ClientConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        let request = client
            .request(Method::GET, "/api/stats")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.headers()[COOKIE], "session=abc123");
        assert!(request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .is_some());
    }

    #[test]
    fn test_log_query_for_page() {
        let mut view = ViewState::default();
        view.current_page = 2;
        let filters = Filters {
            severity: Severity::new(3),
            device: "fw 1".to_string(),
            search: "deny".to_string(),
            ..Filters::default()
        };

        assert_eq!(
            LogQuery::from_state(&view, &filters).to_query_string(),
            "limit=50&offset=100&severity=3&device=fw+1&date_range=24h&search=deny"
        );
    }

    #[test]
    fn test_log_query_custom_span() {
        let filters = Filters {
            date_range: Some("custom".to_string()),
            date_span: DateSpan::new("2024-03-01", "2024-03-02"),
            ..Filters::default()
        };
        let query = LogQuery::from_state(&ViewState::default(), &filters).to_query_string();
        assert_eq!(
            query,
            "limit=50&offset=0&date_from=2024-03-01&date_to=2024-03-02"
        );
    }

    #[test]
    fn test_log_query_span_ignored_without_custom_range() {
        let filters = Filters {
            date_range: Some("7d".to_string()),
            date_span: DateSpan::new("2024-03-01", "2024-03-02"),
            ..Filters::default()
        };
        let query = LogQuery::from_state(&ViewState::default(), &filters).to_query_string();
        assert_eq!(query, "limit=50&offset=0&date_range=7d");
    }

    #[test]
    fn test_recent_query() {
        assert_eq!(LogQuery::recent(10).to_query_string(), "limit=10");
    }
}
