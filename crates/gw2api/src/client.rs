//! Request dispatch. The conversion pipeline only ever sees [Response::content].
use std::fmt::Display;

use gw2_core::config::{ApiConfig, Locale, MAX_IDS_PER_REQUEST};
use itertools::Itertools;
use miette::{Diagnostic, IntoDiagnostic, Result, WrapErr};
use serde::de::DeserializeOwned;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime, PrimitiveDateTime};
use tracing::{debug, warn};
use url::Url;

#[derive(Diagnostic, Debug, Error)]
pub enum ApiError {
    #[error("api answered with status {status}: {text}")]
    #[diagnostic(code(api::upstream))]
    Upstream { status: u16, text: String },
}

/// What to fetch: a resource path like `v2/items`, extra path segments and query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub resource: String,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    /// overrides the client's locale
    pub locale: Option<Locale>,
}

impl Request {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            segments: vec![],
            query: vec![],
            locale: None,
        }
    }

    pub fn segment(mut self, segment: impl Display) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn ids<I: Display>(self, ids: &[I]) -> Self {
        let ids = ids.iter().join(",");
        self.query("ids", ids)
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// resource and segments, relative to the api root
    pub fn path(&self) -> String {
        std::iter::once(self.resource.as_str())
            .chain(self.segments.iter().map(String::as_str))
            .join("/")
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Decoded content plus the metadata the api sends along.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub content: T,
    /// from the `Last-Modified` header
    pub last_modified: Option<OffsetDateTime>,
    pub locale: Option<Locale>,
}

impl<T> Response<T> {
    /// converts the content, keeping the metadata
    pub fn try_map<U, E>(
        self,
        f: impl FnOnce(T) -> std::result::Result<U, E>,
    ) -> std::result::Result<Response<U>, E> {
        Ok(Response {
            content: f(self.content)?,
            last_modified: self.last_modified,
            locale: self.locale,
        })
    }
}

/// Sends requests and decodes their json bodies.
///
/// Must be shareable between threads, batched fetches send from a rayon pool.
pub trait ServiceClient: Sync {
    fn send<T: DeserializeOwned>(&self, request: &Request) -> Result<Response<T>>;

    /// how many ids go into a single `?ids=` request
    fn batch_size(&self) -> usize {
        MAX_IDS_PER_REQUEST
    }
}

/// [ServiceClient] over a blocking [ureq::Agent]. Responses are gzip compressed on the wire.
#[derive(Debug, Clone)]
pub struct HttpServiceClient {
    agent: ureq::Agent,
    config: ApiConfig,
}

impl HttpServiceClient {
    pub fn new(config: ApiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build();
        Self { agent, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn locale_of(&self, request: &Request) -> Locale {
        request.locale.unwrap_or(self.config.locale)
    }

    /// full url of `request`, query included
    pub fn url(&self, request: &Request) -> Result<Url> {
        let mut url = self
            .config
            .root_url()?
            .join(&request.path())
            .into_diagnostic()
            .wrap_err_with(|| format!("invalid request path: {}", request.path()))?;
        {
            let lang: &'static str = self.locale_of(request).into();
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("lang", lang);
        }
        Ok(url)
    }
}

impl Default for HttpServiceClient {
    fn default() -> Self {
        Self::new(ApiConfig::default())
    }
}

impl ServiceClient for HttpServiceClient {
    fn send<T: DeserializeOwned>(&self, request: &Request) -> Result<Response<T>> {
        let url = self.url(request)?;
        let locale = self.locale_of(request);
        debug!(%url, %locale, "sending request");
        let response = match self
            .agent
            .request_url("GET", &url)
            .set("X-Schema-Version", &self.config.schema_version)
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let text = response
                    .into_string()
                    .map(|body| upstream_text(&body))
                    .unwrap_or_default();
                return Err(ApiError::Upstream { status, text }.into());
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(transport)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("failed to send request to {url}"));
            }
        };
        let last_modified = response.header("Last-Modified").and_then(parse_http_date);
        let content = response.into_json::<T>().into_diagnostic().wrap_err_with(|| {
            format!(
                "couldn't convert json result to rust type {}",
                std::any::type_name::<T>()
            )
        })?;
        Ok(Response {
            content,
            last_modified,
            locale: Some(locale),
        })
    }

    fn batch_size(&self) -> usize {
        self.config.batch_size()
    }
}

/// the `text` of an error payload, or the whole body if it isn't one
fn upstream_text(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|payload| payload.get("text")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

const HTTP_DATE: &[FormatItem<'_>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// `Tue, 15 Nov 1994 08:12:31 GMT`. Anything else is logged and dropped.
fn parse_http_date(value: &str) -> Option<OffsetDateTime> {
    match PrimitiveDateTime::parse(value, HTTP_DATE) {
        Ok(date) => Some(date.assume_utc()),
        Err(e) => {
            warn!(value, ?e, "unparsable Last-Modified header");
            None
        }
    }
}

/// An in-memory [ServiceClient] answering from json fixtures.
#[cfg(test)]
pub(crate) mod fake {
    use std::sync::Mutex;

    use super::*;

    type Responder = Box<dyn Fn(&Request) -> Option<String> + Send + Sync>;

    pub(crate) struct FixtureClient {
        respond: Responder,
        batch_size: usize,
        pub(crate) requests: Mutex<Vec<Request>>,
    }

    impl FixtureClient {
        pub(crate) fn new(respond: impl Fn(&Request) -> Option<String> + Send + Sync + 'static) -> Self {
            Self {
                respond: Box::new(respond),
                batch_size: MAX_IDS_PER_REQUEST,
                requests: Mutex::new(vec![]),
            }
        }

        /// answers every request with `body`
        pub(crate) fn fixed(body: &'static str) -> Self {
            Self::new(move |_| Some(body.to_string()))
        }

        pub(crate) fn with_batch_size(mut self, batch_size: usize) -> Self {
            self.batch_size = batch_size;
            self
        }

        pub(crate) fn sent(&self) -> Vec<Request> {
            self.requests.lock().expect("requests lock poisoned").clone()
        }
    }

    impl ServiceClient for FixtureClient {
        fn send<T: DeserializeOwned>(&self, request: &Request) -> Result<Response<T>> {
            self.requests
                .lock()
                .expect("requests lock poisoned")
                .push(request.clone());
            let body = (self.respond)(request).ok_or_else(|| ApiError::Upstream {
                status: 404,
                text: format!("no fixture for {}", request.path()),
            })?;
            let content = serde_json::from_str(&body).into_diagnostic()?;
            Ok(Response {
                content,
                last_modified: None,
                locale: request.locale,
            })
        }

        fn batch_size(&self) -> usize {
            self.batch_size
        }
    }
}
