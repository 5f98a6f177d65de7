pub mod error;
pub mod config;
pub mod transport;
pub mod request;
pub mod retry;
pub mod normalize;
pub mod client;

/*

docgen: send a code snippet to a hosted chat-completions endpoint,
get a docstring back, optionally splice it into the snippet.

docgen/
├── src/
│   ├── lib.rs          # Re-exports and the one-shot entry points
│   ├── main.rs         # `docgen` command line front end
│   ├── error.rs        # Classified failure kinds
│   ├── config.rs       # Environment / JSON configuration
│   ├── client.rs       # Dispatcher: validate, send, classify, retry
│   ├── request.rs      # Chat-completions wire types and prompt
│   ├── retry.rs        # Exponential retry policy and sleeper
│   ├── normalize.rs    # Output cleanup and re-insertion
│   └── transport/      # HTTP seam
│       ├── mod.rs
│       └── http.rs     # reqwest implementation
└── tests/              # Integration tests (spy transports, mock server)

*/

pub use client::{DocClient, Generation, Outcome};
pub use config::{DocgenConfig, RetryConfig};
pub use error::{Error, ErrorKind};
pub use normalize::{clean, insert, LanguageProfile};

/// Send `snippet` to the configured endpoint and return the raw model text
pub async fn generate_documentation(
  snippet: &str
, config: &DocgenConfig
) -> Outcome
{   DocClient::new(config.clone()).generate(snippet).await
}

/// Generate, clean and insert the docstring after the first definition
pub async fn annotate(
  snippet: &str
, config: &DocgenConfig
) -> Outcome
{   DocClient::new(config.clone()).annotate(snippet).await
}
