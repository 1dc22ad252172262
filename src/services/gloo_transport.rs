// ============================================================================
// GLOO TRANSPORT - fetch() through gloo-net, with a timeout
// ============================================================================

use async_trait::async_trait;
use futures::future::{select, Either};
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::future::TimeoutFuture;

use crate::services::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};

#[derive(Clone, Default)]
pub struct GlooTransport;

impl GlooTransport {
    pub fn new() -> Self {
        Self
    }

    fn builder(method: Method, url: &str) -> RequestBuilder {
        match method {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
            Method::Put => Request::put(url),
            Method::Patch => Request::patch(url),
            Method::Delete => Request::delete(url),
        }
    }
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = Self::builder(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let prepared = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let exchange = Box::pin(async move {
            let response = prepared
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
            let status = response.status();
            // Error bodies may be empty or non-JSON; keep whatever came back
            let body = response.text().await.unwrap_or_default();
            Ok::<_, TransportError>(HttpResponse { status, body })
        });
        let deadline = Box::pin(TimeoutFuture::new(request.timeout_ms));

        match select(exchange, deadline).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => {
                log::warn!("⏱️ {} {} timed out", request.method, request.url);
                Err(TransportError::Timeout(request.timeout_ms))
            }
        }
    }
}
