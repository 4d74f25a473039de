use super::error::ApiError;
use super::models::{
    DiskUsageRequest, DiskUsageResponse, ErrorBody, LogsResponse, PingResponse, SecretPayload,
    WorkflowsResponse,
};
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;
use reqwest::blocking::{Client, Request};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for [`ApiClient`]
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub insecure_tls: bool,
    pub timeout_secs: Option<u64>,
    /// Show a spinner on stderr while waiting for the server
    pub show_progress: bool,
}

/// Query of `GET /api/workflows`
#[derive(Debug, Clone, Default)]
pub struct WorkflowsQuery {
    pub workflow: Option<String>,
    pub status: Vec<String>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

/// Query of `GET /api/workflows/{workflow}/logs`
#[derive(Debug, Clone, Default)]
pub struct LogsQuery {
    pub steps: Vec<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

/// Blocking client for the REANA REST API.
///
/// The access token travels as the `access_token` query parameter and is
/// never logged.
pub struct ApiClient {
    http: Client,
    server_url: String,
    access_token: String,
    show_progress: bool,
}

impl ApiClient {
    pub fn new(
        server_url: &str,
        access_token: &str,
        options: &ClientOptions,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .danger_accept_invalid_certs(options.insecure_tls)
            .timeout(Duration::from_secs(
                options.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ))
            .user_agent(concat!("reana-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            server_url: server_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            show_progress: options.show_progress,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let invalid = |reason: String| ApiError::InvalidUrl {
            url: self.server_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.server_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be used as a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn auth_param(&self) -> (&'static str, String) {
        ("access_token", self.access_token.clone())
    }

    pub fn ping_request(&self) -> Result<Request, ApiError> {
        let url = self.endpoint(&["api", "you"])?;
        Ok(self.http.get(url).query(&[self.auth_param()]).build()?)
    }

    pub fn ping(&self) -> Result<PingResponse, ApiError> {
        self.execute(self.ping_request()?, "Contacting REANA server")
    }

    pub fn workflows_request(&self, query: &WorkflowsQuery) -> Result<Request, ApiError> {
        let url = self.endpoint(&["api", "workflows"])?;

        let mut params = vec![self.auth_param(), ("type", "batch".to_string())];
        if let Some(workflow) = &query.workflow {
            params.push(("workflow_id_or_name", workflow.clone()));
        }
        params.extend(query.status.iter().map(|s| ("status", s.clone())));
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        if let Some(size) = query.size {
            params.push(("size", size.to_string()));
        }

        Ok(self.http.get(url).query(&params).build()?)
    }

    pub fn workflows(&self, query: &WorkflowsQuery) -> Result<WorkflowsResponse, ApiError> {
        self.execute(self.workflows_request(query)?, "Fetching workflows")
    }

    pub fn logs_request(&self, workflow: &str, query: &LogsQuery) -> Result<Request, ApiError> {
        let url = self.endpoint(&["api", "workflows", workflow, "logs"])?;

        let mut params = vec![self.auth_param()];
        params.extend(query.steps.iter().map(|s| ("steps", s.clone())));
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        if let Some(size) = query.size {
            params.push(("size", size.to_string()));
        }

        Ok(self.http.get(url).query(&params).build()?)
    }

    pub fn logs(&self, workflow: &str, query: &LogsQuery) -> Result<LogsResponse, ApiError> {
        self.execute(self.logs_request(workflow, query)?, "Fetching logs")
    }

    pub fn disk_usage_request(
        &self,
        workflow: &str,
        body: &DiskUsageRequest,
    ) -> Result<Request, ApiError> {
        let url = self.endpoint(&["api", "workflows", workflow, "disk_usage"])?;
        Ok(self
            .http
            .get(url)
            .query(&[self.auth_param()])
            .json(body)
            .build()?)
    }

    pub fn disk_usage(
        &self,
        workflow: &str,
        body: &DiskUsageRequest,
    ) -> Result<DiskUsageResponse, ApiError> {
        self.execute(
            self.disk_usage_request(workflow, body)?,
            "Fetching workspace disk usage",
        )
    }

    pub fn add_secrets_request(
        &self,
        secrets: &IndexMap<String, SecretPayload>,
        overwrite: bool,
    ) -> Result<Request, ApiError> {
        let url = self.endpoint(&["api", "secrets", ""])?;
        Ok(self
            .http
            .post(url)
            .query(&[self.auth_param(), ("overwrite", overwrite.to_string())])
            .json(secrets)
            .build()?)
    }

    pub fn add_secrets(
        &self,
        secrets: &IndexMap<String, SecretPayload>,
        overwrite: bool,
    ) -> Result<serde_json::Value, ApiError> {
        self.execute(
            self.add_secrets_request(secrets, overwrite)?,
            "Uploading secrets",
        )
    }

    fn execute<T: DeserializeOwned>(&self, request: Request, message: &str) -> Result<T, ApiError> {
        debug!(method = %request.method(), path = request.url().path(), "sending request");

        let spinner = self.spinner(message);
        let result = self.http.execute(request);
        spinner.finish_and_clear();

        let response = result.map_err(|source| self.transport_error(source))?;
        let status = response.status();
        let body = response.text().map_err(|source| self.transport_error(source))?;
        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|error| error.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown server error")
                        .to_string()
                });
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// The request URL carries the access token, so it is stripped from transport errors
    fn transport_error(&self, source: reqwest::Error) -> ApiError {
        let source = source.without_url();
        if source.is_connect() || source.is_timeout() {
            ApiError::Unreachable {
                server_url: self.server_url.clone(),
                source,
            }
        } else {
            ApiError::Transport(source)
        }
    }

    fn spinner(&self, message: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::SecretKind;

    fn client() -> ApiClient {
        ApiClient::new("https://reana.example.org/", "secret", &ClientOptions::default()).unwrap()
    }

    fn query_pairs(request: &Request) -> Vec<(String, String)> {
        request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn body_json(request: &Request) -> serde_json::Value {
        let bytes = request
            .body()
            .and_then(|body| body.as_bytes())
            .expect("request has a buffered body");
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_workflows_request_repeats_status_and_encodes_search() {
        let request = client()
            .workflows_request(&WorkflowsQuery {
                status: vec!["failed".to_string(), "running".to_string()],
                search: Some(r#"{"name":["alpha"]}"#.to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(request.url().path(), "/api/workflows");
        let pairs = query_pairs(&request);
        let statuses: Vec<_> = pairs
            .iter()
            .filter(|(k, _)| k == "status")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(statuses, ["failed", "running"]);
        assert!(pairs.contains(&("search".to_string(), r#"{"name":["alpha"]}"#.to_string())));
        assert!(pairs.contains(&("access_token".to_string(), "secret".to_string())));
    }

    #[test]
    fn test_workflows_request_without_search_has_no_search_param() {
        let request = client().workflows_request(&WorkflowsQuery::default()).unwrap();
        assert!(query_pairs(&request).iter().all(|(k, _)| k != "search"));
    }

    #[test]
    fn test_logs_request_sends_steps() {
        let request = client()
            .logs_request(
                "analysis.1",
                &LogsQuery {
                    steps: vec!["fit".to_string(), "plot".to_string()],
                    page: Some(2),
                    size: None,
                },
            )
            .unwrap();

        assert_eq!(request.url().path(), "/api/workflows/analysis.1/logs");
        let pairs = query_pairs(&request);
        assert_eq!(pairs.iter().filter(|(k, _)| k == "steps").count(), 2);
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert!(pairs.iter().all(|(k, _)| k != "size"));
    }

    #[test]
    fn test_disk_usage_request_carries_json_body() {
        let request = client()
            .disk_usage_request(
                "analysis.1",
                &DiskUsageRequest {
                    summarize: false,
                    search: Some(r#"{"name":["data/"]}"#.to_string()),
                },
            )
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(
            body_json(&request),
            serde_json::json!({"summarize": false, "search": "{\"name\":[\"data/\"]}"})
        );
    }

    #[test]
    fn test_add_secrets_request() {
        let secrets = IndexMap::from([(
            "PASSWORD".to_string(),
            SecretPayload {
                name: "PASSWORD".to_string(),
                kind: SecretKind::Env,
                value: "cGFzcw==".to_string(),
            },
        )]);
        let request = client().add_secrets_request(&secrets, true).unwrap();

        assert_eq!(request.url().path(), "/api/secrets/");
        assert!(query_pairs(&request).contains(&("overwrite".to_string(), "true".to_string())));
        assert_eq!(
            body_json(&request),
            serde_json::json!({"PASSWORD": {"name": "PASSWORD", "type": "env", "value": "cGFzcw=="}})
        );
    }

    #[test]
    fn test_server_path_prefix_is_kept() {
        let client =
            ApiClient::new("https://example.org/reana", "t", &ClientOptions::default()).unwrap();
        let request = client.ping_request().unwrap();
        assert_eq!(request.url().path(), "/reana/api/you");
    }
}
