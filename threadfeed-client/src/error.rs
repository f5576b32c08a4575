use crate::api;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server could not be reached, or failed to answer
    #[error("fetching comments failed")]
    Fetch(#[source] api::Error),

    /// The content was refused, either locally before sending or by the server
    #[error("invalid comment")]
    Validation(#[source] api::Error),

    #[error("submitting comment failed")]
    Submission(#[source] api::Error),

    #[error("deleting comment failed")]
    Delete(#[source] api::Error),

    /// The screen that issued this request is gone, or a newer request superseded it
    #[error("response is stale")]
    StaleResponse,

    #[error("invalid viewing context: {0}")]
    InvalidContext(String),

    #[error("no comment screen is open")]
    NoActiveScreen,
}

impl Error {
    pub fn is_stale(&self) -> bool {
        matches!(self, Error::StaleResponse)
    }
}
