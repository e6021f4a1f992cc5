use std::sync::Arc;

use qa_client::types::{
    ClassificationRequest, ClassificationResponse, GenerationRequest, GenerationResponse,
    HealthStatus,
};

use crate::tui::dashboard::Mode;

/// Work handed from the UI loop to the request worker.
#[derive(Debug, Clone)]
pub enum ApiRequest {
    Generate(GenerationRequest),
    Classify(ClassificationRequest),
    Health,
}

impl ApiRequest {
    /// The form mode this request was submitted from, none for health checks.
    pub fn mode(&self) -> Option<Mode> {
        match self {
            ApiRequest::Generate(_) => Some(Mode::Generation),
            ApiRequest::Classify(_) => Some(Mode::Classification),
            ApiRequest::Health => None,
        }
    }
}

/// What the request worker hands back.
/// Failures only carry the mode, the detail has already been logged.
#[derive(Debug, Clone, strum::AsRefStr)]
pub enum ApiResponse {
    Generated(GenerationResponse),
    Classified(ClassificationResponse),
    Failed(Mode),
    Health(HealthStatus),
    Unreachable(Arc<str>),
}
