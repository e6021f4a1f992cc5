use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The server answered with a status outside of the 2xx range.
    #[error("server responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The request went out but no response came back.
    #[error("no response received from {url}: {source}")]
    NoResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request could not be assembled.
    #[error("error setting up request: {0}")]
    Setup(#[source] reqwest::Error),

    #[error("unable to decode response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("invalid API url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unable to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl Error {
    /// Sort a transport error coming out of [`reqwest::Client::execute`].
    pub(crate) fn from_transport(url: &str, source: reqwest::Error) -> Self {
        if source.is_builder() {
            Error::Setup(source)
        } else {
            Error::NoResponse {
                url: url.to_string(),
                source,
            }
        }
    }

    /// The HTTP status if the server responded at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
