use catalog::FieldError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with `success: false`.
    #[error("{message} (HTTP {status})")]
    Rejected {
        status: u16,
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response carried no data")]
    MissingData,
}

impl ClientError {
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ClientError::Rejected { errors, .. } => errors,
            _ => &[],
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Rejected { status: 404, .. })
    }
}
