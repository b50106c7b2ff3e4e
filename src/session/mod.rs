//! The shared editor state and the rules each producer follows to write it.
//!
//! Every write replaces whole values; there is no merge. Whichever producer
//! writes last owns `generated`.

use crate::language::{classify, file_kind, FileKind, Language, SignatureSet};
use crate::response::ParsedResponse;
use tracing::debug;

pub mod transcript;

pub use transcript::{Role, Transcript};

const PLACEHOLDER_PSEUDOCODE: &str = "// Write your pseudocode here...\n\nFUNCTION calculate_fibonacci(n):\n  IF n <= 1 RETURN n\n  RETURN calculate_fibonacci(n-1) + calculate_fibonacci(n-2)";

const PLACEHOLDER_CODE: &str = "# Generated Python code will appear here\n\ndef calculate_fibonacci(n):\n    if n <= 1:\n        return n\n    return calculate_fibonacci(n - 1) + calculate_fibonacci(n - 2)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeArtifact {
    pub text: String,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pseudocode: String,
    generated: CodeArtifact,
}

/// Which pane a loaded file ended up in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTarget {
    Pseudocode,
    Generated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCorrection {
    pub from: Language,
    pub to: Language,
}

/// What the Run action hands to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub language: Language,
    pub code: String,
    pub correction: Option<LanguageCorrection>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            pseudocode: PLACEHOLDER_PSEUDOCODE.to_string(),
            generated: CodeArtifact {
                text: PLACEHOLDER_CODE.to_string(),
                language: Language::Python,
            },
        }
    }
}

impl SessionState {
    pub fn pseudocode(&self) -> &str {
        &self.pseudocode
    }

    pub fn generated(&self) -> &CodeArtifact {
        &self.generated
    }

    pub fn language(&self) -> &Language {
        &self.generated.language
    }

    pub fn edit_pseudocode(&mut self, text: String) {
        self.pseudocode = text;
    }

    /// Manual edits are trusted verbatim: no language inference.
    pub fn edit_generated_code(&mut self, text: String) {
        self.generated.text = text;
    }

    /// Relabels the code without touching its text.
    pub fn set_language(&mut self, language: Language) {
        self.generated.language = language;
    }

    /// Replaces code and language in one assignment. A blank language keeps
    /// the current label.
    pub fn apply_transcription(&mut self, language: &str, code: String) -> &Language {
        let language = Language::normalize_or(language, self.generated.language.clone());
        self.generated = CodeArtifact {
            text: code,
            language,
        };
        &self.generated.language
    }

    /// Returns `true` when the reply carried a code artifact.
    pub fn apply_chat(&mut self, parsed: &ParsedResponse) -> bool {
        let Some(code) = parsed.extracted_code.as_ref() else {
            return false;
        };

        let language = parsed
            .extracted_language
            .clone()
            .unwrap_or_else(|| self.generated.language.clone());
        self.generated = CodeArtifact {
            text: code.clone(),
            language,
        };
        true
    }

    pub fn apply_file_load(&mut self, name: &str, content: String) -> FileTarget {
        match file_kind(name) {
            FileKind::Pseudocode => {
                self.pseudocode = content;
                FileTarget::Pseudocode
            }
            FileKind::Code(language) => {
                let language = language.unwrap_or_else(|| self.generated.language.clone());
                self.generated = CodeArtifact {
                    text: content,
                    language,
                };
                FileTarget::Generated
            }
        }
    }

    /// Re-classifies the stored code right before execution and corrects a
    /// stale label. Never re-extracts and never downgrades to unknown.
    pub fn prepare_dispatch(&mut self) -> Dispatch {
        let detected = classify(&self.generated.text, SignatureSet::Dispatch);
        let correction = match detected {
            Some(language) if language != self.generated.language => {
                debug!(from = %self.generated.language, to = %language, "correcting language before run");
                let from = std::mem::replace(&mut self.generated.language, language.clone());
                Some(LanguageCorrection { from, to: language })
            }
            _ => None,
        };

        Dispatch {
            language: self.generated.language.clone(),
            code: self.generated.text.clone(),
            correction,
        }
    }
}
