//! Prompt composition
//!
//! Renders a mode-specific template with the retrieved context and the
//! question. Composing a prompt never silently substitutes another mode's
//! template or an inline default: grounded and general carry different
//! safety guarantees, so a missing template is a hard failure.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use streamrag_core::error::{Result, StreamragError};
use streamrag_core::models::{Mode, RetrievedPassage};

/// Placeholder for the mode name
const MODE_TOKEN: &str = "{{MODE}}";
/// Placeholder for the rendered context block
const CONTEXT_TOKEN: &str = "{{CONTEXT}}";
/// Placeholder for the raw query
const QUESTION_TOKEN: &str = "{{QUESTION}}";

/// Port for resolving the raw template text for a mode
///
/// The lookup must be total over both modes and side-effect free; exactly
/// one template resolves per mode.
pub trait TemplateSource: Send + Sync {
    fn resolve(&self, mode: Mode) -> Result<&str>;
}

/// Template source reading `prompt_grounded.txt` / `prompt_general.txt`
/// from a directory, once, at construction
///
/// Loading eagerly makes an unreachable template directory a startup
/// failure instead of a per-request surprise.
#[derive(Debug)]
pub struct FileTemplateSource {
    grounded: String,
    general: String,
}

impl FileTemplateSource {
    /// Load both templates from `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            grounded: read_template(dir, Mode::Grounded)?,
            general: read_template(dir, Mode::General)?,
        })
    }
}

impl TemplateSource for FileTemplateSource {
    fn resolve(&self, mode: Mode) -> Result<&str> {
        match mode {
            Mode::Grounded => Ok(&self.grounded),
            Mode::General => Ok(&self.general),
        }
    }
}

fn template_file(mode: Mode) -> &'static str {
    match mode {
        Mode::Grounded => "prompt_grounded.txt",
        Mode::General => "prompt_general.txt",
    }
}

fn read_template(dir: &Path, mode: Mode) -> Result<String> {
    let path = dir.join(template_file(mode));
    match fs::read_to_string(&path) {
        Ok(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(StreamragError::MissingTemplate { mode }),
    }
}

/// In-memory template source for tests and embedded deployments
#[derive(Debug, Default)]
pub struct StaticTemplateSource {
    templates: HashMap<Mode, String>,
}

impl StaticTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the template for a mode
    pub fn with_template(mut self, mode: Mode, raw_text: impl Into<String>) -> Self {
        self.templates.insert(mode, raw_text.into());
        self
    }
}

impl TemplateSource for StaticTemplateSource {
    fn resolve(&self, mode: Mode) -> Result<&str> {
        self.templates
            .get(&mode)
            .map(String::as_str)
            .ok_or(StreamragError::MissingTemplate { mode })
    }
}

/// Render the context block: a header followed by one `[i] text` line per
/// passage, 1-indexed in retrieval order
///
/// This is the same indexing surfaced in the response `sources`, so a
/// citation `[i]` in the generated answer maps to `sources[i-1]`.
pub fn render_context(passages: &[RetrievedPassage]) -> String {
    let mut lines = Vec::with_capacity(passages.len() + 1);
    lines.push("Context snippets:".to_string());
    for (i, passage) in passages.iter().enumerate() {
        lines.push(format!("[{}] {}", i + 1, passage.text.trim()));
    }
    lines.join("\n")
}

/// Compose the final prompt for a mode
///
/// Substitution is literal and total: `{{MODE}}`, `{{CONTEXT}}`, and
/// `{{QUESTION}}` are replaced everywhere they occur; unrecognized
/// placeholders are left verbatim. The query is inserted as-is, not
/// re-escaped.
pub fn compose(
    query: &str,
    passages: &[RetrievedPassage],
    mode: Mode,
    source: &dyn TemplateSource,
) -> Result<String> {
    let template = source.resolve(mode)?;
    Ok(template
        .replace(MODE_TOKEN, mode.as_str())
        .replace(CONTEXT_TOKEN, &render_context(passages))
        .replace(QUESTION_TOKEN, query))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passages() -> Vec<RetrievedPassage> {
        vec![
            RetrievedPassage {
                text: "Cats are small animals that like to sleep.".to_string(),
                similarity: 0.81,
            },
            RetrievedPassage {
                text: "  Dogs are friendly pets that enjoy walks.  ".to_string(),
                similarity: 0.40,
            },
        ]
    }

    fn source() -> StaticTemplateSource {
        StaticTemplateSource::new()
            .with_template(Mode::Grounded, "mode={{MODE}}\n{{CONTEXT}}\nQ: {{QUESTION}}")
            .with_template(Mode::General, "general {{MODE}} {{CONTEXT}} {{QUESTION}}")
    }

    #[test]
    fn context_block_is_one_indexed_in_retrieval_order() {
        let block = render_context(&passages());
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "Context snippets:");
        assert_eq!(lines[1], "[1] Cats are small animals that like to sleep.");
        assert_eq!(lines[2], "[2] Dogs are friendly pets that enjoy walks.");
    }

    #[test]
    fn empty_passages_render_header_only() {
        assert_eq!(render_context(&[]), "Context snippets:");
    }

    #[test]
    fn compose_substitutes_all_defined_tokens() {
        let prompt = compose("What sleeps?", &passages(), Mode::Grounded, &source()).unwrap();

        assert!(prompt.contains("mode=grounded"));
        assert!(prompt.contains("[1] Cats are small animals that like to sleep."));
        assert!(prompt.ends_with("Q: What sleeps?"));
        assert!(!prompt.contains(MODE_TOKEN));
        assert!(!prompt.contains(CONTEXT_TOKEN));
        assert!(!prompt.contains(QUESTION_TOKEN));
    }

    #[test]
    fn unrecognized_placeholders_stay_verbatim() {
        let source = StaticTemplateSource::new()
            .with_template(Mode::General, "{{MODE}} {{EXTRA}} {{QUESTION}}");

        let prompt = compose("q", &[], Mode::General, &source).unwrap();
        assert_eq!(prompt, "general {{EXTRA}} q");
    }

    #[test]
    fn missing_template_is_never_substituted() {
        let source = StaticTemplateSource::new().with_template(Mode::Grounded, "{{QUESTION}}");

        let err = compose("q", &[], Mode::General, &source).unwrap_err();
        assert!(matches!(
            err,
            StreamragError::MissingTemplate { mode: Mode::General }
        ));
    }

    #[test]
    fn query_is_inserted_without_escaping() {
        let source =
            StaticTemplateSource::new().with_template(Mode::General, "Q: {{QUESTION}}");

        let prompt =
            compose("Is {{CONTEXT}} literal?", &[], Mode::General, &source).unwrap();
        // The query text itself is not re-expanded.
        assert_eq!(prompt, "Q: Is {{CONTEXT}} literal?");
    }
}
