use crate::error::HttpError;
use http::{HeaderValue, Request, Response};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Sets `User-Agent` on requests that do not carry one.
#[derive(Clone)]
pub struct UserAgentLayer {
    user_agent: HeaderValue,
}

impl UserAgentLayer {
    /// # Errors
    /// Returns `HttpError::InvalidHeaderValue` if `user_agent` is not a valid header value.
    pub fn try_new(user_agent: impl AsRef<str>) -> Result<Self, HttpError> {
        let user_agent = HeaderValue::from_str(user_agent.as_ref())?;
        Ok(Self { user_agent })
    }
}

impl<S> Layer<S> for UserAgentLayer {
    type Service = UserAgentService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UserAgentService {
            inner,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Clone)]
pub struct UserAgentService<S> {
    inner: S,
    user_agent: HeaderValue,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for UserAgentService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        req.headers_mut()
            .entry(http::header::USER_AGENT)
            .or_insert_with(|| self.user_agent.clone());
        self.inner.call(req)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;
    use tower::ServiceExt;

    /// Echoes the received `User-Agent` back as the response body.
    #[derive(Clone)]
    struct EchoUa;

    impl Service<Request<Full<Bytes>>> for EchoUa {
        type Response = Response<String>;
        type Error = std::convert::Infallible;
        type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
            let ua = req
                .headers()
                .get(http::header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_owned();
            std::future::ready(Ok(Response::builder()
                .status(StatusCode::OK)
                .body(ua)
                .unwrap()))
        }
    }

    fn request(ua: Option<&str>) -> Request<Full<Bytes>> {
        let mut builder = Request::builder().uri("http://localhost:8002/health");
        if let Some(ua) = ua {
            builder = builder.header(http::header::USER_AGENT, ua);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    #[tokio::test]
    async fn adds_missing_user_agent() {
        let service = UserAgentLayer::try_new("newsly-cli/0.3").unwrap().layer(EchoUa);
        let resp = service.oneshot(request(None)).await.unwrap();
        assert_eq!(resp.body(), "newsly-cli/0.3");
    }

    #[tokio::test]
    async fn keeps_caller_user_agent() {
        let service = UserAgentLayer::try_new("newsly-cli/0.3").unwrap().layer(EchoUa);
        let resp = service.oneshot(request(Some("probe/1.0"))).await.unwrap();
        assert_eq!(resp.body(), "probe/1.0");
    }

    #[test]
    fn rejects_control_characters() {
        assert!(UserAgentLayer::try_new("bad\x00agent").is_err());
    }
}
