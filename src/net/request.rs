use crate::errors::FetchError;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method};
use url::Url;

#[derive(Debug, Clone)]
struct PostBody {
    data: Vec<u8>,
    content_type: String,
}

/// Description of a single request. Nothing is validated until the request is
/// handed to [`Session::fetch`](crate::net::Session::fetch).
///
/// Header and query items are sent in insertion order, but servers should not
/// rely on it.
#[derive(Debug, Clone)]
pub struct Request {
    url: String,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<PostBody>,
    ascii_result: bool,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
            ascii_result: false,
        }
    }

    /// A POST request carrying `body` with the given `Content-Type`.
    pub fn post(url: impl Into<String>, body: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        let mut req = Self::get(url);
        req.body = Some(PostBody {
            data: body.into(),
            content_type: content_type.into(),
        });
        req
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Ask for an ASCII rendition of the body next to the raw bytes.
    pub fn ascii_result(mut self, on: bool) -> Self {
        self.ascii_result = on;
        self
    }

    pub fn method(&self) -> Method {
        if self.body.is_some() {
            Method::POST
        } else {
            Method::GET
        }
    }

    pub fn wants_ascii(&self) -> bool {
        self.ascii_result
    }

    /// Parses the URL, checks the scheme and appends the query items.
    pub(crate) fn resolve_url(&self, https_only: bool) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.url)?;
        match url.scheme() {
            "https" => {}
            "http" if !https_only => {}
            other => return Err(FetchError::UnsupportedScheme(other.to_string())),
        }

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    pub(crate) fn header_map(&self) -> Result<HeaderMap, FetchError> {
        let mut map = HeaderMap::with_capacity(self.headers.len() + 1);
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| FetchError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| FetchError::InvalidHeader(format!("{name}: {value}")))?;
            map.append(name, value);
        }

        if let Some(body) = &self.body {
            let value = HeaderValue::from_str(&body.content_type)
                .map_err(|_| FetchError::InvalidHeader(format!("content-type: {}", body.content_type)))?;
            map.insert(CONTENT_TYPE, value);
        }
        Ok(map)
    }

    pub(crate) fn take_body(&mut self) -> Option<Vec<u8>> {
        self.body.take().map(|b| b.data)
    }
}
