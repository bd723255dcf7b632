// ----- standard library imports
use std::sync::Arc;
use std::time::Duration;
// ----- extra library imports
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
// ----- local imports
use crate::codec::{self, BodyCodec, NamingCodec, OverrideDirection, RequestBody};
use crate::error::{Error, Result};
use crate::materialize::{Exchange, FromResponse};
use crate::options::{Content, RequestOptions};

// ----- end imports

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub enum TlsVersion {
    #[serde(rename = "1.0")]
    Tls1_0,
    #[serde(rename = "1.1")]
    Tls1_1,
    #[serde(rename = "1.2")]
    Tls1_2,
    #[serde(rename = "1.3")]
    Tls1_3,
}

impl From<TlsVersion> for reqwest::tls::Version {
    fn from(version: TlsVersion) -> Self {
        match version {
            TlsVersion::Tls1_0 => Self::TLS_1_0,
            TlsVersion::Tls1_1 => Self::TLS_1_1,
            TlsVersion::Tls1_2 => Self::TLS_1_2,
            TlsVersion::Tls1_3 => Self::TLS_1_3,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RestHandlerConfig {
    pub base_url: Option<String>,
    /// normalize the base URL to end with exactly one '/'
    pub fix_end_of_url: bool,
    #[serde(rename = "timeout_ms")]
    #[serde_as(as = "Option<serde_with::DurationMilliSeconds<u64>>")]
    pub timeout: Option<Duration>,
    pub min_tls_version: Option<TlsVersion>,
    pub max_tls_version: Option<TlsVersion>,
    pub default_headers: Vec<(String, Vec<String>)>,
}

impl Default for RestHandlerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            fix_end_of_url: true,
            timeout: None,
            min_tls_version: None,
            max_tls_version: None,
            default_headers: Vec::new(),
        }
    }
}

/// Issues REST calls against an optional base URL and materializes the
/// responses into the requested result shape.
///
/// Every call builds its own transport client from the handler defaults and
/// the call's [`RequestOptions`], the client is dropped when the call ends.
#[derive(Debug, Clone)]
pub struct RestHandler {
    base: Option<Url>,
    default_headers: Vec<(String, Vec<String>)>,
    timeout: Option<Duration>,
    min_tls_version: Option<TlsVersion>,
    max_tls_version: Option<TlsVersion>,
    codec: Arc<dyn BodyCodec>,
}

enum Payload {
    None,
    Empty,
    Model(RequestBody),
    Content(Content),
}

impl RestHandler {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(RestHandlerConfig {
            base_url: Some(base_url.to_owned()),
            ..Default::default()
        })
    }

    /// A handler for absolute URLs only.
    pub fn without_base() -> Self {
        Self {
            base: None,
            default_headers: Vec::new(),
            timeout: None,
            min_tls_version: None,
            max_tls_version: None,
            codec: Arc::new(NamingCodec::default()),
        }
    }

    pub fn with_config(cfg: RestHandlerConfig) -> Result<Self> {
        let RestHandlerConfig {
            base_url,
            fix_end_of_url,
            timeout,
            min_tls_version,
            max_tls_version,
            default_headers,
        } = cfg;
        if let (Some(min), Some(max)) = (min_tls_version, max_tls_version) {
            if min > max {
                return Err(Error::InvalidTlsRange { min, max });
            }
        }
        let base = match base_url {
            Some(base_url) => parse_base(&base_url, fix_end_of_url)?,
            None => None,
        };
        Ok(Self {
            base,
            default_headers,
            timeout,
            min_tls_version,
            max_tls_version,
            codec: Arc::new(NamingCodec::default()),
        })
    }

    /// Wire names in snake_case.
    pub fn snake_case(base_url: &str, direction: OverrideDirection) -> Result<Self> {
        Ok(Self::new(base_url)?.with_codec(NamingCodec::snake_case(direction)))
    }

    /// Wire names in camelCase.
    pub fn camel_case(base_url: &str, direction: OverrideDirection) -> Result<Self> {
        Ok(Self::new(base_url)?.with_codec(NamingCodec::camel_case(direction)))
    }

    pub fn with_codec(mut self, codec: impl BodyCodec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    pub fn set_default_headers(&mut self, headers: Vec<(String, Vec<String>)>) {
        self.default_headers = headers;
    }

    pub fn add_default_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.default_headers.push((name.into(), vec![value.into()]));
    }

    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    pub fn codec(&self) -> &dyn BodyCodec {
        self.codec.as_ref()
    }

    pub fn resolve(&self, partial: &str) -> Result<Url> {
        let url = match &self.base {
            Some(base) => base.join(partial)?,
            None => Url::parse(partial)?,
        };
        Ok(url)
    }

    pub async fn get<R>(&self, url: &str, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
    {
        self.execute(Method::GET, url, Payload::None, options).await
    }

    pub async fn post<R>(&self, url: &str, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
    {
        self.execute(Method::POST, url, Payload::Empty, options)
            .await
    }

    pub async fn put<R>(&self, url: &str, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
    {
        self.execute(Method::PUT, url, Payload::Empty, options).await
    }

    pub async fn patch<R>(&self, url: &str, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
    {
        self.execute(Method::PATCH, url, Payload::Empty, options)
            .await
    }

    pub async fn delete<R>(&self, url: &str, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
    {
        self.execute(Method::DELETE, url, Payload::None, options)
            .await
    }

    pub async fn post_model<R, Q>(&self, url: &str, model: &Q, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
        Q: Serialize + ?Sized,
    {
        let body = codec::encode(self.codec(), model, options)?;
        self.execute(Method::POST, url, Payload::Model(body), options)
            .await
    }

    pub async fn put_model<R, Q>(&self, url: &str, model: &Q, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
        Q: Serialize + ?Sized,
    {
        let body = codec::encode(self.codec(), model, options)?;
        self.execute(Method::PUT, url, Payload::Model(body), options)
            .await
    }

    pub async fn patch_model<R, Q>(
        &self,
        url: &str,
        model: &Q,
        options: &RequestOptions,
    ) -> Result<R>
    where
        R: FromResponse,
        Q: Serialize + ?Sized,
    {
        let body = codec::encode(self.codec(), model, options)?;
        self.execute(Method::PATCH, url, Payload::Model(body), options)
            .await
    }

    pub async fn delete_model<R, Q>(
        &self,
        url: &str,
        model: &Q,
        options: &RequestOptions,
    ) -> Result<R>
    where
        R: FromResponse,
        Q: Serialize + ?Sized,
    {
        let body = codec::encode(self.codec(), model, options)?;
        self.execute(Method::DELETE, url, Payload::Model(body), options)
            .await
    }

    pub async fn post_content<R>(
        &self,
        url: &str,
        content: Content,
        options: &RequestOptions,
    ) -> Result<R>
    where
        R: FromResponse,
    {
        self.execute(Method::POST, url, Payload::Content(content), options)
            .await
    }

    pub async fn put_content<R>(
        &self,
        url: &str,
        content: Content,
        options: &RequestOptions,
    ) -> Result<R>
    where
        R: FromResponse,
    {
        self.execute(Method::PUT, url, Payload::Content(content), options)
            .await
    }

    pub async fn patch_content<R>(
        &self,
        url: &str,
        content: Content,
        options: &RequestOptions,
    ) -> Result<R>
    where
        R: FromResponse,
    {
        self.execute(Method::PATCH, url, Payload::Content(content), options)
            .await
    }

    pub async fn delete_content<R>(
        &self,
        url: &str,
        content: Content,
        options: &RequestOptions,
    ) -> Result<R>
    where
        R: FromResponse,
    {
        self.execute(Method::DELETE, url, Payload::Content(content), options)
            .await
    }

    async fn execute<R>(
        &self,
        method: Method,
        url: &str,
        payload: Payload,
        options: &RequestOptions,
    ) -> Result<R>
    where
        R: FromResponse,
    {
        let url = self.resolve(url)?;
        let mut headers = self.headers(options)?;
        let response_encoding = options
            .response_charset
            .as_deref()
            .map(codec::resolve_charset)
            .transpose()?;

        let (body, content_type, request_text) = match payload {
            Payload::None => (None, None, None),
            Payload::Empty => (Some(Vec::new()), None, None),
            Payload::Model(body) => (Some(body.bytes), Some(body.content_type), Some(body.text)),
            Payload::Content(content) => (Some(content.bytes), content.content_type, None),
        };
        // a content type supplied by the caller wins
        if let Some(content_type) = content_type {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, HeaderValue::from_str(&content_type)?);
            }
        }

        let cl = self.client(options)?;
        tracing::debug!("{method} {url}");
        let mut request = cl.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }
        let res = request.send().await?;
        let status = res.status();
        tracing::debug!("response status {status}");
        let response_text = match response_encoding {
            Some(encoding) => res.text_with_charset(encoding.name()).await?,
            None => res.text().await?,
        };

        let exchange = Exchange {
            status,
            request_text,
            response_text,
        };
        R::from_response(exchange, self.codec(), &options.fallbacks)
    }

    fn headers(&self, options: &RequestOptions) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, values) in self.default_headers.iter().chain(options.headers.iter()) {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            for value in values {
                headers.append(name.clone(), HeaderValue::from_str(value)?);
            }
        }
        Ok(headers)
    }

    fn client(&self, options: &RequestOptions) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().gzip(options.use_gzip);
        if let Some(timeout) = options.timeout.or(self.timeout) {
            builder = builder.timeout(timeout);
        }
        if let Some(version) = self.min_tls_version {
            builder = builder.min_tls_version(version.into());
        }
        if let Some(version) = self.max_tls_version {
            builder = builder.max_tls_version(version.into());
        }
        Ok(builder.build()?)
    }
}

fn parse_base(base_url: &str, fix_end_of_url: bool) -> Result<Option<Url>> {
    let base_url = base_url.trim();
    if base_url.is_empty() {
        return Ok(None);
    }
    let base = if fix_end_of_url {
        Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?
    } else {
        Url::parse(base_url)?
    };
    Ok(Some(base))
}
