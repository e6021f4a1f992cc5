//! Hooks around every request the [`Client`](crate::Client) sends.

use reqwest::RequestBuilder;

use crate::error::Error;

/// Runs on every outgoing request before it is built.
pub trait RequestInterceptor: Send + Sync + std::fmt::Debug {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }
}

/// Runs on every completed call.
/// Successful responses pass through untouched;
/// errors are observed and handed back to the caller unchanged.
pub trait ResponseInterceptor: Send + Sync + std::fmt::Debug {
    fn on_response(&self, response: reqwest::Response) -> reqwest::Response {
        response
    }

    fn on_error(&self, _error: &Error) {}
}

/// Leaves requests as they are.
/// Header injection belongs here once the API needs it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl RequestInterceptor for PassThrough {}

/// Logs failures by where they happened.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorLogger;

impl ResponseInterceptor for ErrorLogger {
    fn on_error(&self, error: &Error) {
        match error {
            Error::Status { status, body } => {
                tracing::error!(%status, %body, "API error");
            }
            Error::NoResponse { url, source } => {
                tracing::error!(%url, error = %source, timeout = source.is_timeout(), "no response received");
            }
            Error::Decode(source) => {
                tracing::error!(error = %source, "unexpected response body");
            }
            Error::Setup(_) | Error::InvalidUrl { .. } | Error::HttpClient(_) => {
                tracing::error!(%error, "error setting up request");
            }
        }
    }
}
