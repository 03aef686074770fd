use std::error::Error;
use std::fmt;

/// An error response returned from the B2 API.
///
/// Every non-success response carries the same three fields regardless of the endpoint.
#[derive(Clone, PartialEq, Eq, Debug, serde::Deserialize, serde::Serialize)]
pub struct ErrorResponse {
    /// The HTTP status value, duplicated into the body by the service.
    ///
    /// Example values include: `400` (Bad Request), `401` (Unauthorized), and `404` (Not Found).
    pub status: u16,

    /// A short machine readable code.
    ///
    /// Example values include `bad_request`, `expired_auth_token` and `not_found`.
    pub code: String,

    /// Human readable description of the error.
    pub message: String,
}

impl ErrorResponse {
    /// Returns `true` when the token used for the request is no longer accepted.
    ///
    /// For upload requests this means the upload grant has to be discarded.
    pub fn is_auth_expired(&self) -> bool {
        self.status == 401 && matches!(self.code.as_str(), "expired_auth_token" | "bad_auth_token")
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Status: {}, Code: {}, Message: {}", self.status, self.code, self.message)
    }
}

impl Error for ErrorResponse {}

/// Precondition violations detected before any request is sent.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no file name provided")]
    MissingFileName,
    #[error("no file data provided")]
    MissingFileData,
    #[error("no file id provided")]
    MissingFileId,
    #[error("more than {max} file info entries provided: {0}", max = super::MAX_FILE_INFO)]
    TooManyFileInfo(usize),
    #[error("start file id requires a start file name")]
    StartFileIdWithoutName,
    /// `.` and `..` segments are collapsed by url normalisation, so the file can not be addressed by name.
    #[error("file name has a relative path segment: {0}")]
    RelativePathSegment(String),
}
