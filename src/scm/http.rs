//! Blocking JSON-over-HTTP plumbing shared by the REST providers.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the token is presented to the API.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TokenAuth {
    /// `Authorization: Bearer <token>`
    Bearer,
    /// A custom header carrying the raw token, e.g. GitLab's `PRIVATE-TOKEN`.
    Header(&'static str),
}

/// A REST endpoint with authentication baked into its default headers.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    http: HttpClient,
    base: String,
}

impl ApiClient {
    pub(crate) fn new(base: &str, token: &str, auth: TokenAuth, accept: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value(accept)?);
        if !token.is_empty() {
            let mut value = match auth {
                TokenAuth::Bearer => header_value(&format!("Bearer {}", token))?,
                TokenAuth::Header(_) => header_value(token)?,
            };
            value.set_sensitive(true);
            match auth {
                TokenAuth::Bearer => headers.insert(AUTHORIZATION, value),
                TokenAuth::Header(name) => headers.insert(HeaderName::from_static(name), value),
            };
        }

        let http = HttpClient::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn base(&self) -> &str {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base, path.trim_start_matches('/'));
        log::debug!("{} {}", method, url);
        self.http.request(method, url)
    }

    pub(crate) fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send()?;
        Ok(check(response, path)?.json()?)
    }

    pub(crate) fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(method, path).json(body).send()?;
        Ok(check(response, path)?.json()?)
    }

    pub(crate) fn delete(&self, path: &str) -> Result<()> {
        let response = self.request(Method::DELETE, path).send()?;
        check(response, path)?;
        Ok(())
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| Error::invalid(format!("invalid header value: {}", e)))
}

/// Maps non-success statuses onto the crate's provider errors.
fn check(response: Response, path: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(status_error(status, path, body))
}

fn status_error(status: StatusCode, path: &str, body: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound {
            resource: path.to_string(),
        },
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => Error::Conflict { message: body },
        _ => Error::Api {
            status: status.as_u16(),
            message: body,
        },
    }
}

/// Collects list results across pages.
///
/// With `page > 0` exactly that page is fetched. With `page == 0` pages are
/// walked from 1 until a short page arrives or `size` items are collected
/// (`size == 0` means no limit). `fetch` receives `(page, per_page)`.
pub(crate) fn collect_pages<T>(
    page: u32,
    size: u32,
    max_per_page: u32,
    mut fetch: impl FnMut(u32, u32) -> Result<Vec<T>>,
) -> Result<Vec<T>> {
    let per_page = if size == 0 {
        max_per_page
    } else {
        size.min(max_per_page)
    };
    if page > 0 {
        return fetch(page, per_page);
    }

    let limit = if size == 0 { usize::MAX } else { size as usize };
    let mut items = Vec::new();
    let mut current = 1;
    loop {
        let batch = fetch(current, per_page)?;
        let short = batch.len() < per_page as usize;
        items.extend(batch);
        if short || items.len() >= limit {
            break;
        }
        current += 1;
    }
    items.truncate(limit);
    Ok(items)
}

/// Bytes escaped in a path segment: everything except the RFC 3986
/// unreserved set.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes a single path segment (`group/repo` becomes
/// `group%2Frepo`).
pub(crate) fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}
