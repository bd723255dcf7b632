// ----- standard library imports
// ----- extra library imports
use serde::Serialize;
// ----- local imports
use crate::error::{Error, Result};
use crate::handler::RestHandlerConfig;
use crate::materialize::FromResponse;
use crate::options::{Content, RequestOptions};

// ----- end imports

/// Blocking counterpart of [`crate::RestHandler`].
///
/// Each call blocks the current thread until the response is materialized.
/// Must not be used from within an async runtime.
#[derive(Debug)]
pub struct RestHandler {
    inner: crate::RestHandler,
    runtime: tokio::runtime::Runtime,
}

impl RestHandler {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::from_async(crate::RestHandler::new(base_url)?)
    }

    pub fn with_config(cfg: RestHandlerConfig) -> Result<Self> {
        Self::from_async(crate::RestHandler::with_config(cfg)?)
    }

    pub fn from_async(inner: crate::RestHandler) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;
        Ok(Self { inner, runtime })
    }

    pub fn inner(&self) -> &crate::RestHandler {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut crate::RestHandler {
        &mut self.inner
    }

    pub fn get<R: FromResponse>(&self, url: &str, options: &RequestOptions) -> Result<R> {
        self.runtime.block_on(self.inner.get(url, options))
    }

    pub fn post<R: FromResponse>(&self, url: &str, options: &RequestOptions) -> Result<R> {
        self.runtime.block_on(self.inner.post(url, options))
    }

    pub fn put<R: FromResponse>(&self, url: &str, options: &RequestOptions) -> Result<R> {
        self.runtime.block_on(self.inner.put(url, options))
    }

    pub fn patch<R: FromResponse>(&self, url: &str, options: &RequestOptions) -> Result<R> {
        self.runtime.block_on(self.inner.patch(url, options))
    }

    pub fn delete<R: FromResponse>(&self, url: &str, options: &RequestOptions) -> Result<R> {
        self.runtime.block_on(self.inner.delete(url, options))
    }

    pub fn post_model<R, Q>(&self, url: &str, model: &Q, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
        Q: Serialize + ?Sized,
    {
        self.runtime
            .block_on(self.inner.post_model(url, model, options))
    }

    pub fn put_model<R, Q>(&self, url: &str, model: &Q, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
        Q: Serialize + ?Sized,
    {
        self.runtime.block_on(self.inner.put_model(url, model, options))
    }

    pub fn patch_model<R, Q>(&self, url: &str, model: &Q, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
        Q: Serialize + ?Sized,
    {
        self.runtime
            .block_on(self.inner.patch_model(url, model, options))
    }

    pub fn delete_model<R, Q>(&self, url: &str, model: &Q, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
        Q: Serialize + ?Sized,
    {
        self.runtime
            .block_on(self.inner.delete_model(url, model, options))
    }

    pub fn post_content<R>(&self, url: &str, content: Content, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
    {
        self.runtime
            .block_on(self.inner.post_content(url, content, options))
    }

    pub fn put_content<R>(&self, url: &str, content: Content, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
    {
        self.runtime
            .block_on(self.inner.put_content(url, content, options))
    }

    pub fn patch_content<R>(&self, url: &str, content: Content, options: &RequestOptions) -> Result<R>
    where
        R: FromResponse,
    {
        self.runtime
            .block_on(self.inner.patch_content(url, content, options))
    }

    pub fn delete_content<R>(
        &self,
        url: &str,
        content: Content,
        options: &RequestOptions,
    ) -> Result<R>
    where
        R: FromResponse,
    {
        self.runtime
            .block_on(self.inner.delete_content(url, content, options))
    }
}
