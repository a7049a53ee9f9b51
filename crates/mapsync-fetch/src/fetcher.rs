use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt;
use mapsync_verify::{Digest, hash_and_buffer};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::http::{BoxStream, HttpClient};
use crate::{FetchError, Result};

/// Buffers remote resources, optionally hashing them on the way in.
pub struct Fetcher<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self { Self { client } }

    pub fn client(&self) -> &C { &self.client }

    async fn open(&self, url: &str) -> Result<BoxStream<'static, Result<Bytes>>> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .await
            .map_err(|e| FetchError::transport(url, e))?;
        if !response.is_success() {
            return Err(FetchError::Status {
                url:    url.to_string(),
                status: response.status,
            });
        }
        let url = url.to_string();
        Ok(Box::pin(
            response.body.map_err(move |e| FetchError::transport(&url, e)),
        ))
    }

    /// GET `url` into one buffer. Non-2xx statuses are errors.
    pub async fn fetch(&self, url: &str) -> Result<Bytes> {
        let body = self.open(url).await?;
        let buffer = body
            .try_fold(BytesMut::new(), |mut buffer, chunk| async move {
                buffer.extend_from_slice(&chunk);
                Ok(buffer)
            })
            .await?;
        debug!(url, bytes = buffer.len(), "fetched");
        Ok(buffer.freeze())
    }

    /// Like [`fetch`](Self::fetch), computing the SHA-256 of the body as it arrives.
    pub async fn fetch_with_digest(&self, url: &str) -> Result<(Bytes, Digest)> {
        let body = self.open(url).await?;
        let (buffer, digest) = hash_and_buffer(body).await?;
        debug!(url, bytes = buffer.len(), %digest, "fetched");
        Ok((buffer, digest))
    }

    /// GET `url` and decode the body as JSON.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.fetch(url).await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
