//! Chat-completions wire types and prompt construction

use serde::{Deserialize, Serialize};
use log::debug;
use crate::config::DocgenConfig;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   pub fn system(content: impl Into<String>) -> Self
    {   ChatMessage { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self
    {   ChatMessage { role: "user".to_string(), content: content.into() }
    }
}

/// Outbound request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , pub temperature: f32
  , pub max_tokens: usize
}

/// Success envelope; choices may carry `message.content` or `text`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse
{   pub choices: Vec<Choice>
  , #[serde(default)]
    pub usage: Option<Usage>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   #[serde(default)]
    pub message: Option<ChoiceMessage>
  , #[serde(default)]
    pub text: Option<String>
  , #[serde(default)]
    pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage
{   #[serde(default)]
    pub content: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage
{   #[serde(default)]
    pub total_tokens: Option<usize>
}

impl ChatResponse
{   /// Text of the first choice, whichever shape it came in
    pub fn first_text(&self) -> Result<String, Error>
    {   let choice = self.choices.first().ok_or_else(|| {
          Error::MalformedResponse(
            "response contained no choices".to_string()
          )
        })?;
        choice.message.as_ref()
          .and_then(|m| m.content.clone())
          .or_else(|| choice.text.clone())
          .ok_or_else(|| {
            Error::MalformedResponse(
              "first choice has neither message.content nor text"
                .to_string()
            )
          })
    }
}

/// Parse a 2xx body into the model's raw text
pub fn parse_response(body: &str) -> Result<String, Error>
{   let response: ChatResponse = serde_json::from_str(body)?;
    if let Some(tokens) = response.usage.as_ref().and_then(|u| u.total_tokens)
    {   debug!("Response used {} tokens", tokens);
    }
    response.first_text()
}

/// Instruction sent as the system message
pub fn system_instruction(config: &DocgenConfig) -> String
{   format!(
      "You are an expert {lang} developer. Generate a comprehensive \
       {style} docstring for the function the user provides. \
       Only output the docstring, nothing else.",
      lang = config.language.display_name,
      style = config.doc_style,
    )
}

/// Build the request body for one snippet
pub fn build_request(snippet: &str, config: &DocgenConfig) -> ChatRequest
{   ChatRequest
    {   model: config.model.clone()
      , messages: vec![
          ChatMessage::system(system_instruction(config))
        , ChatMessage::user(format!("Function:\n\n{}", snippet))
        ]
      , temperature: config.temperature
      , max_tokens: config.max_tokens
    }
}
