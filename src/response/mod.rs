//! Turns a raw assistant reply into chat text plus an optional code artifact.

pub mod fence;

use crate::language::{classify, Language, SignatureSet};

/// Shown in place of a reply that consisted of nothing but the code block.
pub const UPDATE_CONFIRMATION: &str = "I've updated the editor with the requested code.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub display_text: String,
    pub extracted_code: Option<String>,
    /// Unset when the fence had no tag and no signature matched; the session
    /// keeps its current label in that case.
    pub extracted_language: Option<Language>,
}

pub fn resolve(response: &str) -> ParsedResponse {
    let Some(block) = fence::extract(response) else {
        return ParsedResponse {
            display_text: response.to_string(),
            extracted_code: None,
            extracted_language: None,
        };
    };

    let tag = block.tag.trim().to_lowercase();
    let extracted_language = if tag.is_empty() {
        classify(block.code, SignatureSet::Chat)
    } else {
        Language::normalize(&tag)
    };

    let residual = block.residual();
    let display_text = if residual.is_empty() {
        UPDATE_CONFIRMATION.to_string()
    } else {
        residual
    };

    ParsedResponse {
        display_text,
        extracted_code: Some(block.code.to_string()),
        extracted_language,
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve, UPDATE_CONFIRMATION};
    use crate::language::Language;

    #[test]
    fn plain_reply_passes_through_unchanged() {
        let reply = "  Recursion calls the function again.  ";
        let parsed = resolve(reply);
        assert_eq!(parsed.display_text, reply);
        assert!(parsed.extracted_code.is_none());
        assert!(parsed.extracted_language.is_none());
    }

    #[test]
    fn tagged_block_is_split_from_prose() {
        let parsed = resolve("Sure!\n```python\nprint(1)\n```");
        assert_eq!(parsed.extracted_language, Some(Language::Python));
        assert_eq!(parsed.extracted_code.as_deref(), Some("print(1)\n"));
        assert_eq!(parsed.display_text, "Sure!");
    }

    #[test]
    fn code_only_reply_gets_confirmation_text() {
        let parsed = resolve("```js\nconsole.log(1);\n```\n");
        assert_eq!(parsed.display_text, UPDATE_CONFIRMATION);
        assert_eq!(parsed.extracted_language, Some(Language::JavaScript));
    }

    #[test]
    fn untagged_block_falls_back_to_signatures() {
        let parsed = resolve("```\npackage main\nfunc main(){}\n```");
        assert_eq!(parsed.extracted_language, Some(Language::Go));
        assert_eq!(
            parsed.extracted_code.as_deref(),
            Some("package main\nfunc main(){}\n")
        );
    }

    #[test]
    fn untagged_block_with_chat_only_signature() {
        let parsed = resolve("Try this\n```\nlet x = 1;\n```");
        assert_eq!(parsed.extracted_language, Some(Language::JavaScript));
    }

    #[test]
    fn unrecognized_untagged_block_leaves_language_unset() {
        let parsed = resolve("Output:\n```\nhello\n```");
        assert_eq!(parsed.extracted_code.as_deref(), Some("hello\n"));
        assert!(parsed.extracted_language.is_none());
        assert_eq!(parsed.display_text, "Output:");
    }

    #[test]
    fn unknown_tag_is_capitalized() {
        let parsed = resolve("```KOTLIN\nfun main() {}\n```");
        assert_eq!(
            parsed.extracted_language,
            Some(Language::Other("Kotlin".to_string()))
        );
    }
}
