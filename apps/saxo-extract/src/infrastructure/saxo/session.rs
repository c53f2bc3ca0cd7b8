//! HTTP session context.
//!
//! One logical browser session per run: a cookie jar shared by every request,
//! a fixed User-Agent, and session headers (the bearer token after login).
//! Request-scoped overrides go through [`SessionContext::scoped_header`], which
//! restores the previous value when the guard drops, on every exit path.

use std::ops::{Deref, DerefMut};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use serde::Serialize;

use super::config::SaxoConfig;
use super::error::SaxoError;

/// Cookie-carrying HTTP session.
#[derive(Debug)]
pub struct SessionContext {
    client: Client,
    headers: HeaderMap,
}

impl SessionContext {
    /// Build a session from config.
    pub fn new(config: &SaxoConfig) -> Result<Self, SaxoError> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| SaxoError::Http(e.to_string()))?;

        Ok(Self {
            client,
            headers: HeaderMap::new(),
        })
    }

    /// Set a header on every following request.
    pub fn set_header(&mut self, name: HeaderName, value: &str) -> Result<(), SaxoError> {
        let value = HeaderValue::from_str(value)
            .map_err(|e| SaxoError::Http(format!("invalid value for {name}: {e}")))?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Current session value of a header.
    #[must_use]
    pub fn header(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Override a header until the returned guard drops.
    pub fn scoped_header(&mut self, name: HeaderName, value: HeaderValue) -> ScopedHeader<'_> {
        let previous = self.headers.insert(name.clone(), value);
        ScopedHeader {
            session: self,
            name,
            previous,
        }
    }

    /// GET `url`.
    pub async fn get(&self, url: &str) -> Result<Response, SaxoError> {
        tracing::debug!(url, "GET");
        Ok(self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?)
    }

    /// GET `url` with percent-encoded query parameters.
    pub async fn get_with_query(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Response, SaxoError> {
        tracing::debug!(url, "GET");
        Ok(self
            .client
            .get(url)
            .query(query)
            .headers(self.headers.clone())
            .send()
            .await?)
    }

    /// POST `url` without a body.
    pub async fn post_empty(&self, url: &str) -> Result<Response, SaxoError> {
        tracing::debug!(url, "POST");
        Ok(self
            .client
            .post(url)
            .headers(self.headers.clone())
            .send()
            .await?)
    }

    /// POST a JSON body.
    pub async fn post_json<B: Serialize + ?Sized + Sync>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Response, SaxoError> {
        tracing::debug!(url, "POST json");
        Ok(self
            .client
            .post(url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await?)
    }

    /// POST a pre-encoded body. The content type comes from the session headers.
    pub async fn post_body(&self, url: &str, body: String) -> Result<Response, SaxoError> {
        tracing::debug!(url, "POST");
        Ok(self
            .client
            .post(url)
            .headers(self.headers.clone())
            .body(body)
            .send()
            .await?)
    }
}

/// Guard for a temporary header override; derefs to the session.
#[derive(Debug)]
pub struct ScopedHeader<'a> {
    session: &'a mut SessionContext,
    name: HeaderName,
    previous: Option<HeaderValue>,
}

impl Deref for ScopedHeader<'_> {
    type Target = SessionContext;

    fn deref(&self) -> &Self::Target {
        self.session
    }
}

impl DerefMut for ScopedHeader<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session
    }
}

impl Drop for ScopedHeader<'_> {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => {
                self.session.headers.insert(self.name.clone(), value);
            }
            None => {
                self.session.headers.remove(&self.name);
            }
        }
    }
}

/// Read a response body as text, requiring a success status.
pub async fn success_text(response: Response) -> Result<String, SaxoError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(SaxoError::UnexpectedStatus {
            status: status.as_u16(),
            expected: 200,
            message: text,
        });
    }
    Ok(text)
}
