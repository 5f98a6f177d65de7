use std::time::{Duration, Instant};
use log::{debug, trace, warn, error, info};
use crate::config::DocgenConfig;
use crate::error::Error;
use crate::normalize;
use crate::request::{build_request, parse_response, ChatRequest};
use crate::retry::{RetryPolicy, Sleeper, TokioSleeper};
use crate::transport::{HttpReply, HttpTransport, Transport, TransportError};

/// Successful result of a documentation request
#[derive(Debug, Clone, PartialEq)]
pub struct Generation
{   /// Model output (raw, cleaned or spliced depending on the call)
    pub text: String
  , /// Attempts used, including the successful one
    pub attempts: usize
  , /// Round trip of the successful attempt
    pub latency: Duration
}

impl Generation
{   pub fn latency_ms(&self) -> f64
    {   self.latency.as_secs_f64() * 1000.0
    }
}

/// Either the generated text or exactly one classified failure
pub type Outcome = Result<Generation, Error>;

/// Map one HTTP exchange to text or a classified error
pub fn classify_reply(reply: HttpReply) -> Result<String, Error>
{   let HttpReply { status, body } = reply;
    match status
    {   200..=299 => parse_response(&body)
      , 401 => Err(Error::Authentication(body))
      , 429 | 500 | 502 | 503 | 504 => {
          Err(Error::Transient(format!("status {}: {}", status, body)))
        }
      , _ => Err(Error::RequestRejected { status, body })
    }
}

fn classify_transport(e: TransportError) -> Error
{   match e
    {   TransportError::Invalid(msg) => Error::Configuration(msg)
      , other => Error::Transient(other.to_string())
    }
}

/// Request dispatcher: validates, sends, classifies and retries
pub struct DocClient<T = HttpTransport, S = TokioSleeper>
{   config: DocgenConfig
  , policy: RetryPolicy
  , transport: T
  , sleeper: S
}

impl DocClient
{   /// Client over HTTP with real sleeps
    pub fn new(config: DocgenConfig) -> Self
    {   DocClient::with_parts(config, HttpTransport::new(), TokioSleeper)
    }
}

impl<T: Transport, S: Sleeper> DocClient<T, S>
{   pub fn with_parts(
      config: DocgenConfig
    , transport: T
    , sleeper: S
    ) -> Self
    {   debug!("Creating DocClient for model: {}", config.model);
        let policy = RetryPolicy::from(&config.retry);
        DocClient
        {   config
          , policy
          , transport
          , sleeper
        }
    }

    pub fn config(&self) -> &DocgenConfig
    {   &self.config
    }

    /// Send the snippet and return the model's raw text
    pub async fn generate(&self, snippet: &str) -> Outcome
    {   if let Err(e) = self.config.validate()
        {   error!("{}", e);
            return Err(e);
        }
        if snippet.trim().is_empty()
        {   warn!("Refusing to send an empty snippet");
            return Err(Error::EmptySnippet);
        }

        let request = build_request(snippet, &self.config);
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let mut attempt = 0;

        loop
        {   let started = Instant::now();
            match self.attempt(&request, timeout).await
            {   Ok(text) => {
                  let generation = Generation
                  {   text
                    , attempts: attempt + 1
                    , latency: started.elapsed()
                  };
                  info!(
                    "Generated documentation in {:.2} ms after {} attempt(s)",
                    generation.latency_ms(), generation.attempts
                  );
                  return Ok(generation);
                }
              , Err(Error::Transient(detail)) => {
                  if !self.policy.has_next(attempt)
                  {   error!(
                        "Giving up after {} attempts: {}",
                        attempt + 1, detail
                      );
                      return Err(Error::NetworkExhausted
                      {   attempts: attempt + 1
                        , last: detail
                      });
                  }
                  let delay = self.policy.backoff_for_attempt(attempt);
                  warn!(
                    "Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt + 1, self.policy.max_attempts, detail, delay
                  );
                  self.sleeper.sleep(delay).await;
                  attempt += 1;
                }
              , Err(e) => {
                  error!("Request failed: {}", e);
                  return Err(e);
                }
            }
        }
    }

    /// Generate and strip wrapping artifacts
    pub async fn docstring(&self, snippet: &str) -> Outcome
    {   let mut generation = self.generate(snippet).await?;
        generation.text = normalize::clean(
          &generation.text, &self.config.language
        );
        Ok(generation)
    }

    /// Generate, clean and splice the docstring into the snippet
    pub async fn annotate(&self, snippet: &str) -> Outcome
    {   let mut generation = self.docstring(snippet).await?;
        generation.text = normalize::insert(
          snippet, &generation.text, &self.config.language
        );
        Ok(generation)
    }

    async fn attempt(
      &self
    , request: &ChatRequest
    , timeout: Duration
    ) -> Result<String, Error>
    {   trace!("Dispatching to {}", self.config.endpoint);
        let reply = self.transport
          .post(&self.config.endpoint, &self.config.api_key, request, timeout)
          .await
          .map_err(classify_transport)?;
        classify_reply(reply)
    }
}
