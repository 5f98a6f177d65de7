use std::fmt;

/// Classified failure of a documentation request
/// Implements Clone so outcomes can be stored and compared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Credential or endpoint missing, or credential is a placeholder
    Configuration(String)
  , /// Snippet was empty or whitespace only
    EmptySnippet
  , /// Endpoint rejected the credential (HTTP 401)
    Authentication(String)
  , /// Any other terminal non-2xx status
    RequestRejected
    {   status: u16
      , body: String
    }
  , /// Retryable failure (429, 5xx, timeout, connection error)
    Transient(String)
  , /// Attempt ceiling reached on transient failures
    NetworkExhausted
    {   attempts: usize
      , last: String
    }
  , /// 2xx response whose body did not match the expected envelope
    MalformedResponse(String)
}

/// Fieldless discriminant of [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind
{   Configuration
  , EmptySnippet
  , Authentication
  , RequestRejected
  , Transient
  , NetworkExhausted
  , MalformedResponse
}

impl Error
{   pub fn kind(&self) -> ErrorKind
    {   match self
        {   Error::Configuration(_) => ErrorKind::Configuration
          , Error::EmptySnippet => ErrorKind::EmptySnippet
          , Error::Authentication(_) => ErrorKind::Authentication
          , Error::RequestRejected { .. } => ErrorKind::RequestRejected
          , Error::Transient(_) => ErrorKind::Transient
          , Error::NetworkExhausted { .. } => ErrorKind::NetworkExhausted
          , Error::MalformedResponse(_) => ErrorKind::MalformedResponse
        }
    }

    /// Only transient failures are worth another attempt
    pub fn is_retryable(&self) -> bool
    {   matches!(self, Error::Transient(_))
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::Configuration(msg) => {
              write!(f, "Configuration error: {}", msg)
            }
          , Error::EmptySnippet => {
              write!(f, "Please provide a function to analyze")
            }
          , Error::Authentication(body) => {
              write!(f, "Authentication failed: {}", body)
            }
          , Error::RequestRejected { status, body } => {
              write!(f,
                "Request rejected with status {}: {}",
                status, body
              )
            }
          , Error::Transient(msg) => {
              write!(f, "Transient failure: {}", msg)
            }
          , Error::NetworkExhausted { attempts, last } => {
              write!(f,
                "Gave up after {} attempts: {}",
                attempts, last
              )
            }
          , Error::MalformedResponse(msg) => {
              write!(f, "Malformed response: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error
{   fn from(e: serde_json::Error) -> Self
    {   Error::MalformedResponse(e.to_string())
    }
}
