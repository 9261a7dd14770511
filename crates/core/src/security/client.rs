//! Blocking HTTP client for the contact-form endpoints

use crate::error::ProbeError;
use serde::Deserialize;
use std::time::Duration;

pub const CSRF_TOKEN_PATH: &str = "/api/csrf-token";
pub const CONTACT_FORM_PATH: &str = "/api/forms/contact";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

const TIMEOUT_SECS: u64 = 10;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsrfResponse {
    csrf_token: String,
}

/// What came back from one request
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    /// Header names are lowercase
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> impl Iterator<Item = &str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .filter(move |(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Session against one site: cookies persist across requests and the CSRF
/// token (if the site issues one) is attached to every form post.
pub struct FormClient {
    base_url: String,
    http: reqwest::blocking::Client,
    csrf_token: Option<String>,
}

impl FormClient {
    pub fn new(base_url: &str) -> Result<Self, ProbeError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .cookie_store(true)
            .build()
            .map_err(ProbeError::Client)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            csrf_token: None,
        })
    }

    /// Like [`FormClient::new`], then fetch a CSRF token.
    ///
    /// A site that does not issue tokens is still tested; the failure is logged.
    pub fn connect(base_url: &str) -> Result<Self, ProbeError> {
        let mut client = Self::new(base_url)?;
        match client.fetch_csrf_token() {
            Ok(token) => client.csrf_token = Some(token),
            Err(e) => tracing::warn!("no CSRF token, continuing without one: {}", e),
        }
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn fetch_csrf_token(&self) -> Result<String, ProbeError> {
        let url = self.url(CSRF_TOKEN_PATH);
        let fail = |source: reqwest::Error| ProbeError::Request {
            url: url.clone(),
            source,
        };

        let body: CsrfResponse = self
            .http
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(fail)?;
        Ok(body.csrf_token)
    }

    /// POST a JSON body to the contact form
    pub fn submit_contact(&self, body: &serde_json::Value) -> Result<Reply, ProbeError> {
        let request = self.http.post(self.url(CONTACT_FORM_PATH)).json(body);
        self.send(self.with_token(request))
    }

    /// POST a raw body with an explicit content type to the contact form
    pub fn submit_raw(&self, content_type: &str, body: String) -> Result<Reply, ProbeError> {
        let request = self
            .http
            .post(self.url(CONTACT_FORM_PATH))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body);
        self.send(self.with_token(request))
    }

    /// POST a JSON body with neither cookies nor a CSRF token
    pub fn submit_contact_anonymously(&self, body: &serde_json::Value) -> Result<Reply, ProbeError> {
        let fresh = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(ProbeError::Client)?;
        self.send(fresh.post(self.url(CONTACT_FORM_PATH)).json(body))
    }

    fn with_token(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match self.csrf_token {
            Some(ref token) => request.header(CSRF_HEADER, token),
            None => request,
        }
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<Reply, ProbeError> {
        let url = self.url(CONTACT_FORM_PATH);
        let response = request.send().map_err(|source| ProbeError::Request {
            url: url.clone(),
            source,
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_ascii_lowercase(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .text()
            .map_err(|source| ProbeError::Request { url, source })?;

        Ok(Reply {
            status,
            headers,
            body,
        })
    }
}
