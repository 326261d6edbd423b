//! Request logging for the gRPC surface.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use http::{Request, Response};
use tower::{Layer, Service};
use tracing::info;

/// Split a gRPC request path (`/package.Service/Method`) into service and
/// method labels.
fn split_grpc_path(path: &str) -> (&str, &str) {
    let mut parts = path.trim_start_matches('/').splitn(2, '/');
    let service = parts.next().filter(|s| !s.is_empty()).unwrap_or("unknown");
    let method = parts.next().filter(|m| !m.is_empty()).unwrap_or("unknown");
    (service, method)
}

/// A Tower layer that logs every RPC with its duration and status.
#[derive(Clone, Copy)]
pub struct GrpcLoggingLayer;

impl<S> Layer<S> for GrpcLoggingLayer {
    type Service = GrpcLoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GrpcLoggingService { inner }
    }
}

/// The service wrapper produced by [`GrpcLoggingLayer`].
#[derive(Clone)]
pub struct GrpcLoggingService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for GrpcLoggingService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let path = req.uri().path().to_string();
        let (service, method) = {
            let (s, m) = split_grpc_path(&path);
            (s.to_string(), m.to_string())
        };

        info!(
            grpc.service = %service,
            grpc.method = %method,
            "gRPC request started"
        );

        let mut inner = self.inner.clone();
        Box::pin(async move {
            let result = inner.call(req).await;
            let duration_ms = start.elapsed().as_millis();

            match &result {
                Ok(response) => {
                    // 0 is the gRPC OK status; the header is absent on
                    // plain successes.
                    let status = response
                        .headers()
                        .get("grpc-status")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("0");
                    info!(
                        grpc.service = %service,
                        grpc.method = %method,
                        grpc.status = %status,
                        duration_ms = %duration_ms,
                        "gRPC request completed"
                    );
                }
                Err(_) => {
                    info!(
                        grpc.service = %service,
                        grpc.method = %method,
                        grpc.status = "error",
                        duration_ms = %duration_ms,
                        "gRPC request failed"
                    );
                }
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_grpc_path_full() {
        let (service, method) = split_grpc_path("/drivedup.DrivedupDaemon/Replicate");
        assert_eq!(service, "drivedup.DrivedupDaemon");
        assert_eq!(method, "Replicate");
    }

    #[test]
    fn test_split_grpc_path_missing_method() {
        let (service, method) = split_grpc_path("/drivedup.DrivedupDaemon");
        assert_eq!(service, "drivedup.DrivedupDaemon");
        assert_eq!(method, "unknown");
    }

    #[test]
    fn test_split_grpc_path_empty() {
        assert_eq!(split_grpc_path("/"), ("unknown", "unknown"));
        assert_eq!(split_grpc_path(""), ("unknown", "unknown"));
    }
}
