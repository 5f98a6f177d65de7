use std::time::Duration;
use async_trait::async_trait;
use log::{debug, trace, error};
use crate::request::ChatRequest;
use super::{HttpReply, Transport, TransportError};

/// reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct HttpTransport
{   http_client: reqwest::Client
}

impl HttpTransport
{   pub fn new() -> Self
    {   debug!("Creating HttpTransport");
        HttpTransport
        {   http_client: reqwest::Client::new()
        }
    }

    /// Reuse an existing client (proxy or TLS settings)
    pub fn with_client(http_client: reqwest::Client) -> Self
    {   HttpTransport { http_client }
    }
}

fn classify(e: reqwest::Error) -> TransportError
{   if e.is_builder()
    {   TransportError::Invalid(e.to_string())
    } else if e.is_timeout()
    {   TransportError::Timeout(e.to_string())
    } else if e.is_connect()
    {   TransportError::Connect(e.to_string())
    } else
    {   TransportError::Other(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport
{   async fn post(
      &self
    , url: &str
    , api_key: &str
    , body: &ChatRequest
    , timeout: Duration
    ) -> Result<HttpReply, TransportError>
    {   trace!("POST {} model={}", url, body.model);

        let response = self.http_client
          .post(url)
          .header("Authorization", format!("Bearer {}", api_key))
          .header("Content-Type", "application/json")
          .timeout(timeout)
          .json(body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            classify(e)
          })?;

        let status = response.status().as_u16();
        trace!("Response status: {}", status);

        let body = response.text().await.map_err(|e| {
          error!("Failed to read body: {}", e);
          classify(e)
        });
        reply_from_body(status, body)
    }
}

/// A non-2xx status is kept even when its body could not be read, so the
/// status alone decides whether the attempt is retried
fn reply_from_body(
  status: u16
, body: Result<String, TransportError>
) -> Result<HttpReply, TransportError>
{   match body
    {   Ok(body) => Ok(HttpReply { status, body })
      , Err(e) if !(200..300).contains(&status) => {
          Ok(HttpReply { status, body: format!("<unreadable body: {}>", e) })
        }
      , Err(e) => Err(e)
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[tokio::test]
    async fn unparsable_url_is_invalid()
    {   let transport = HttpTransport::new();
        let body = ChatRequest
        {   model: "m".to_string()
          , messages: vec![]
          , temperature: 0.1
          , max_tokens: 16
        };
        let err = transport
          .post("not a url", "k", &body, Duration::from_secs(1))
          .await
          .unwrap_err();
        assert!(matches!(err, TransportError::Invalid(_)), "{:?}", err);
    }

    #[test]
    fn unreadable_body_keeps_terminal_status()
    {   let reply = reply_from_body(
          401
        , Err(TransportError::Other("connection reset".into()))
        ).unwrap();
        assert_eq!(reply.status, 401);
        assert!(reply.body.contains("connection reset"));

        let reply = reply_from_body(
          503
        , Err(TransportError::Other("connection reset".into()))
        ).unwrap();
        assert_eq!(reply.status, 503);
    }

    #[test]
    fn unreadable_success_body_is_a_transport_error()
    {   let err = reply_from_body(
          200
        , Err(TransportError::Other("connection reset".into()))
        ).unwrap_err();
        assert!(matches!(err, TransportError::Other(_)));
    }
}
