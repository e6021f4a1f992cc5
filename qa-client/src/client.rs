use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use crate::{
    config::{ApiConfig, ApiHost},
    error::{Error, Result},
    interceptor::{ErrorLogger, PassThrough, RequestInterceptor, ResponseInterceptor},
    types::{
        ClassificationRequest, ClassificationResponse, GenerationRequest, GenerationResponse,
        HealthStatus,
    },
};

pub const GENERATE_PATH: &str = "/api/v1/llm/generate";
pub const CLASSIFY_PATH: &str = "/api/v1/classify";
pub const HEALTH_PATH: &str = "/api/v1/health";

/// HTTP client for the inference API.
/// Cheap to clone; clones share the connection pool and interceptors.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    host: ApiHost,
    request_interceptor: Arc<dyn RequestInterceptor>,
    response_interceptor: Arc<dyn ResponseInterceptor>,
}

impl Client {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(Error::HttpClient)?;

        Ok(Client {
            http,
            host: config.host.clone(),
            request_interceptor: Arc::new(PassThrough),
            response_interceptor: Arc::new(ErrorLogger),
        })
    }

    pub fn with_request_interceptor(self, interceptor: impl RequestInterceptor + 'static) -> Self {
        Client {
            request_interceptor: Arc::new(interceptor),
            ..self
        }
    }

    pub fn with_response_interceptor(
        self,
        interceptor: impl ResponseInterceptor + 'static,
    ) -> Self {
        Client {
            response_interceptor: Arc::new(interceptor),
            ..self
        }
    }

    pub fn host(&self) -> &ApiHost {
        &self.host
    }

    #[instrument(skip(self, request), fields(prompt.len = request.prompt.len()))]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        self.post(GENERATE_PATH, request).await
    }

    #[instrument(skip(self, request), fields(categories = ?request.categories))]
    pub async fn classify(&self, request: &ClassificationRequest) -> Result<ClassificationResponse> {
        self.post(CLASSIFY_PATH, request).await
    }

    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthStatus> {
        self.get(HEALTH_PATH).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.host.endpoint(path);
        let request = self.http.request(Method::POST, url.as_str()).json(body);
        self.send(&url, request).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.host.endpoint(path);
        let request = self.http.request(Method::GET, url.as_str());
        self.send(&url, request).await
    }

    async fn send<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> Result<T> {
        self.execute(url, request)
            .await
            .inspect_err(|error| self.response_interceptor.on_error(error))
    }

    async fn execute<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> Result<T> {
        let request = self
            .request_interceptor
            .intercept(request)
            .build()
            .map_err(Error::Setup)?;

        tracing::debug!(method = %request.method(), %url, "sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| Error::from_transport(url, source))?;
        let response = self.response_interceptor.on_response(response);

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status { status, body });
        }

        response.json().await.map_err(Error::Decode)
    }
}
