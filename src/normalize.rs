//! Cleanup of raw model output and re-insertion into the snippet

use serde::{Deserialize, Serialize};
use log::{debug, trace};
use crate::error::Error;

const FENCE: &str = "```";
const INDENT_STEP: &str = "    ";

/// Language-specific markers used while cleaning and inserting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageProfile
{   /// Name used in the system instruction
    pub display_name: String
  , /// Tag following the opening code fence
    pub fence_tag: String
  , /// Delimiter that opens and closes a documentation comment
    pub doc_delimiter: String
  , /// Prefixes of a definition line, matched after leading whitespace
    pub def_keywords: Vec<String>
}

impl Default for LanguageProfile
{   fn default() -> Self
    {   LanguageProfile
        {   display_name: "Python".to_string()
          , fence_tag: "python".to_string()
          , doc_delimiter: "\"\"\"".to_string()
          , def_keywords: vec![
              "def ".to_string()
            , "async def ".to_string()
            ]
        }
    }
}

impl LanguageProfile
{   /// Empty markers would match every line
    pub fn validate(&self) -> Result<(), Error>
    {   if self.doc_delimiter.is_empty()
        {   return Err(Error::Configuration(
              "language.doc_delimiter must not be empty".to_string()
            ));
        }
        if self.def_keywords.is_empty()
          || self.def_keywords.iter().any(|k| k.trim().is_empty())
        {   return Err(Error::Configuration(
              "language.def_keywords must be non-empty strings".to_string()
            ));
        }
        Ok(())
    }

    fn is_definition(&self, line: &str) -> bool
    {   let line = line.trim_start();
        self.def_keywords.iter().any(|k| line.starts_with(k.as_str()))
    }
}

/// Strip fence and delimiter wrappers from raw model output.
///
/// Each marker is removed at most once, re-trimming after every removal:
/// leading fence opener, leading delimiter, trailing fence, trailing
/// delimiter.
pub fn clean(raw: &str, profile: &LanguageProfile) -> String
{   let opener = format!("{}{}", FENCE, profile.fence_tag);
    let delimiter = profile.doc_delimiter.as_str();
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(opener.as_str())
    {   trace!("Stripped leading fence");
        text = rest.trim();
    }
    if let Some(rest) = text.strip_prefix(delimiter)
    {   trace!("Stripped leading delimiter");
        text = rest.trim();
    }
    if let Some(rest) = text.strip_suffix(FENCE)
    {   trace!("Stripped trailing fence");
        text = rest.trim();
    }
    if let Some(rest) = text.strip_suffix(delimiter)
    {   trace!("Stripped trailing delimiter");
        text = rest.trim();
    }
    text.to_string()
}

/// Insert `doc` as a documentation comment after the first definition line.
///
/// Returns the snippet unchanged when there is no definition line or the
/// line after it already opens a documentation comment.
pub fn insert(snippet: &str, doc: &str, profile: &LanguageProfile) -> String
{   let delimiter = profile.doc_delimiter.as_str();
    let eol = line_ending(snippet);
    let lines: Vec<&str> = snippet.split(eol).collect();

    let Some(def_idx) = lines.iter().position(|l| profile.is_definition(l))
    else
    {   debug!("No definition line found, snippet left unchanged");
        return snippet.to_string();
    };

    if lines.get(def_idx + 1)
      .is_some_and(|next| next.trim_start().starts_with(delimiter))
    {   debug!("Documentation already present at line {}", def_idx + 2);
        return snippet.to_string();
    }

    let def_line = lines[def_idx];
    let leading = &def_line[..def_line.len() - def_line.trim_start().len()];
    let indent = format!("{}{}", leading, INDENT_STEP);

    let mut doc_lines = doc.split('\n')
      .map(|l| l.strip_suffix('\r').unwrap_or(l));
    let first = doc_lines.next().unwrap_or("");
    let rest: Vec<&str> = doc_lines.collect();
    let strip = common_indent(&rest);

    let mut block = Vec::with_capacity(rest.len() + 2);
    block.push(format!("{}{}{}", indent, delimiter, first));
    for line in rest
    {   if line.trim().is_empty()
        {   block.push(String::new());
        } else
        {   let body = line.get(strip..).unwrap_or_else(|| line.trim_start());
            block.push(format!("{}{}", indent, body));
        }
    }
    block.push(format!("{}{}", indent, delimiter));

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + block.len());
    out.extend(lines[..=def_idx].iter().map(|l| l.to_string()));
    out.extend(block);
    out.extend(lines[def_idx + 1..].iter().map(|l| l.to_string()));
    out.join(eol)
}

/// `\r\n` when the snippet uses it anywhere, `\n` otherwise
fn line_ending(snippet: &str) -> &'static str
{   if snippet.contains("\r\n") { "\r\n" } else { "\n" }
}

/// Smallest leading-whitespace width among non-blank lines
fn common_indent(lines: &[&str]) -> usize
{   lines.iter()
      .filter(|l| !l.trim().is_empty())
      .map(|l| l.len() - l.trim_start().len())
      .min()
      .unwrap_or(0)
}
