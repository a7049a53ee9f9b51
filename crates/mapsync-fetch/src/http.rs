use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Status line and body of a GET.
pub struct HttpResponse<E> {
    pub status: u16,
    pub body:   BoxStream<'static, Result<Bytes, E>>,
}

impl<E> HttpResponse<E> {
    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

/// Asynchronous HTTP client abstraction.
///
/// This is the minimal interface the fetcher needs. Implementations handle
/// their own redirect following, timeouts, and headers; status interpretation
/// is left to [`Fetcher`](crate::Fetcher).
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - [`MockHttpClient`](crate::mock::MockHttpClient): scripted responses for tests
pub trait HttpClient: Send + Sync {
    /// Error type for transport failures (DNS, connect, reset, ...).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue a GET and hand back the status with a streaming body.
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<HttpResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;

    /// Production HTTP client implementation using reqwest.
    ///
    /// Redirects are followed (release assets are served through one) and a
    /// `User-Agent` is always sent, which the GitHub API insists on.
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new() -> crate::Result<Self> {
            Self::with_user_agent(concat!("mapsync/", env!("CARGO_PKG_VERSION")))
        }

        pub fn with_user_agent(user_agent: &str) -> crate::Result<Self> {
            let client = reqwest::Client::builder()
                .user_agent(user_agent)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()
                .map_err(|e| crate::FetchError::Client(e.to_string()))?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(&self, url: &str) -> Result<HttpResponse<Self::Error>, Self::Error> {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            Ok(HttpResponse {
                status,
                body: Box::pin(response.bytes_stream()),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
