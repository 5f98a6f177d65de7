//! Outbound HTTP seam used by the dispatcher

pub mod http;

use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use crate::request::ChatRequest;

// Re-export for convenience
pub use http::HttpTransport;

/// Status and body of one completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply
{   pub status: u16
  , pub body: String
}

/// Failure before a status line was received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError
{   /// Attempt exceeded its timeout
    Timeout(String)
  , /// Could not connect to the endpoint
    Connect(String)
  , /// Request could not be built (bad URL, bad header)
    Invalid(String)
  , /// Any other I/O failure while sending or reading
    Other(String)
}

impl fmt::Display for TransportError
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   match self
        {   TransportError::Timeout(msg) => write!(f, "timeout: {}", msg)
          , TransportError::Connect(msg) => write!(f, "connection error: {}", msg)
          , TransportError::Invalid(msg) => write!(f, "invalid request: {}", msg)
          , TransportError::Other(msg) => write!(f, "network error: {}", msg)
        }
    }
}

impl std::error::Error for TransportError {}

/// One POST per attempt; classification is left to the caller
#[async_trait]
pub trait Transport: Send + Sync
{   async fn post(
      &self
    , url: &str
    , api_key: &str
    , body: &ChatRequest
    , timeout: Duration
    ) -> Result<HttpReply, TransportError>;
}
