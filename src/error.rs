use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot build endpoint under {0}")]
    InvalidEndpoint(String),
}

impl ClientError {
    pub fn is_http_status(&self) -> bool {
        matches!(self, ClientError::HttpStatus { .. })
    }
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("external id {0:?} is not usable as a file name")]
    InvalidExtId(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not serialize slots: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not move artifact into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}
