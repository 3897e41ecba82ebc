//! HTTP adapter over a loaded [SpamDetector].
//!
//! The detector is constructed once, before the listener is bound, and every
//! connection task holds an `Arc` to it. Routing and the JSON envelopes live in [api];
//! this module only moves bytes between hyper and those handlers.

use std::{convert::Infallible, future::Future, sync::Arc};

use burn::config::Config;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::{
    body::{Body, Bytes, Incoming},
    server::conn::http1,
    service::service_fn,
    Request, Response, StatusCode,
};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::{models::Classifier, pipelines::text_classification::SpamDetector};

/// Routes and JSON envelopes
pub mod api;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Define configuration struct for the HTTP server
#[derive(Config, Debug)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[config(default = "\"0.0.0.0:5000\".to_string()")]
    pub bind: String,

    /// Directory holding the trained model artifact
    #[config(default = "\"artifacts\".to_string()")]
    pub artifact_dir: String,
}

/// Accept connections on `listener` until `shutdown` resolves
pub async fn serve<C, F>(
    listener: TcpListener,
    detector: Arc<SpamDetector<C>>,
    shutdown: F,
) -> std::io::Result<()>
where
    C: Classifier + 'static,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    log::info!("Listening on http://{}", listener.local_addr()?);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(err) => {
                    log::warn!("Unable to accept connection: {err}");
                    continue;
                }
            },
            _ = &mut shutdown => {
                log::info!("Shutting down");
                return Ok(());
            }
        };

        let detector = Arc::clone(&detector);

        tokio::spawn(async move {
            let service = service_fn(move |request: Request<Incoming>| {
                let detector = Arc::clone(&detector);

                async move { handle(&detector, request).await }
            });

            if let Err(err) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                log::debug!("Connection from {peer} ended with error: {err}");
            }
        });
    }
}

/// Resolve once `signal` fires. A signal that fails to install never resolves, so the
/// server keeps running instead of shutting down right after binding.
pub async fn shutdown_on<F, E>(signal: F)
where
    F: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    if let Err(err) = signal.await {
        log::error!("Unable to listen for shutdown signal: {err}");

        std::future::pending::<()>().await;
    }
}

/// Collect the request body and dispatch it to the matching route
pub async fn handle<C, B>(
    detector: &SpamDetector<C>,
    request: Request<B>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    C: Classifier,
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let (parts, body) = request.into_parts();

    let body = match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            return Ok(api::error(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("Request body must be at most {MAX_BODY_BYTES} bytes"),
            )
            .into_http_response());
        }
        Err(err) => {
            log::debug!("Unable to read request body: {err}");

            return Ok(
                api::error(StatusCode::BAD_REQUEST, "Unable to read request body")
                    .into_http_response(),
            );
        }
    };

    let response = api::route(detector, &parts.method, parts.uri.path(), &body);

    log::debug!(
        "{} {} -> {}",
        parts.method,
        parts.uri.path(),
        response.status()
    );

    Ok(response.into_http_response())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_shutdown_on_signal() {
        let fired = tokio::time::timeout(
            Duration::from_millis(100),
            shutdown_on(async { Ok::<(), std::io::Error>(()) }),
        )
        .await;

        assert!(fired.is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_on_failed_signal_never_resolves() {
        let error = std::io::Error::new(std::io::ErrorKind::Other, "no signal handler");
        let signal = async move { Err::<(), _>(error) };
        let fired = tokio::time::timeout(Duration::from_millis(100), shutdown_on(signal)).await;

        assert!(fired.is_err());
    }
}
