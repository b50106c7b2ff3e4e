//! Canonical language names, tag aliases and the file-extension table.

use std::fmt;
use std::path::Path;

pub mod classify;

pub use classify::{classify, SignatureSet};

/// A programming language under its single canonical display spelling.
///
/// `Other` carries an unrecognized tag in its capitalized fallback form, so
/// every value round-trips through [`Language::normalize`] unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Rust,
    Cpp,
    C,
    Go,
    Other(String),
}

impl Language {
    /// Every language with a canonical spelling, in menu order.
    pub const KNOWN: [Language; 7] = [
        Self::Python,
        Self::JavaScript,
        Self::TypeScript,
        Self::Rust,
        Self::Cpp,
        Self::C,
        Self::Go,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Rust => "Rust",
            Self::Cpp => "C++",
            Self::C => "C",
            Self::Go => "Go",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Maps a raw tag to its canonical language. Returns `None` only for a
    /// blank tag.
    pub fn normalize(tag: &str) -> Option<Self> {
        let lowered = tag.trim().to_lowercase();
        let language = match lowered.as_str() {
            "" => return None,
            "go" | "golang" => Self::Go,
            "py" | "python" => Self::Python,
            "js" | "javascript" => Self::JavaScript,
            "ts" | "typescript" => Self::TypeScript,
            "rs" | "rust" => Self::Rust,
            "cpp" | "c++" => Self::Cpp,
            "c" => Self::C,
            _ => Self::Other(capitalize(&lowered)),
        };
        Some(language)
    }

    pub fn normalize_or(tag: &str, default: Language) -> Self {
        Self::normalize(tag).unwrap_or(default)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper-cases the first char only when that maps to a single char, so the
/// result lower-cases back to its input.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut upper = first.to_uppercase();
    let head = match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => first,
    };
    std::iter::once(head).chain(chars).collect()
}

/// What a file opened from the explorer feeds into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Pseudocode,
    /// Generated code; `None` when the suffix is not in the extension table.
    Code(Option<Language>),
}

/// Derives the file kind from the name suffix alone, never from content.
pub fn file_kind(name: &str) -> FileKind {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pseudo") | Some("txt") => FileKind::Pseudocode,
        Some("py") => FileKind::Code(Some(Language::Python)),
        Some("js") => FileKind::Code(Some(Language::JavaScript)),
        Some("ts") => FileKind::Code(Some(Language::TypeScript)),
        Some("rs") => FileKind::Code(Some(Language::Rust)),
        Some("cpp") => FileKind::Code(Some(Language::Cpp)),
        Some("c") => FileKind::Code(Some(Language::C)),
        Some("go") => FileKind::Code(Some(Language::Go)),
        _ => FileKind::Code(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{file_kind, FileKind, Language};

    #[test]
    fn known_languages_normalize_to_themselves() {
        for language in Language::KNOWN {
            assert_eq!(Language::normalize(language.as_str()), Some(language.clone()));
        }
    }

    #[test]
    fn normalize_ignores_case_and_surrounding_whitespace() {
        assert_eq!(Language::normalize(" PY "), Some(Language::Python));
        assert_eq!(Language::normalize("python"), Some(Language::Python));
        assert_eq!(Language::normalize("GoLang"), Some(Language::Go));
        assert_eq!(Language::normalize("c++"), Some(Language::Cpp));
        assert_eq!(Language::normalize("CPP").map(|l| l.to_string()).as_deref(), Some("C++"));
    }

    #[test]
    fn normalize_is_idempotent_over_display_names() {
        for tag in ["py", "js", "ts", "rs", "cpp", "c", "golang", "KOTLIN", "c#", "ßharp", "ǆango"] {
            let once = Language::normalize(tag).expect("non-empty tag should normalize");
            let twice = Language::normalize(once.as_str()).expect("display name should normalize");
            assert_eq!(once, twice, "normalization drifted for {tag}");
        }
    }

    #[test]
    fn multi_char_uppercase_keeps_first_char() {
        assert_eq!(
            Language::normalize("ßharp"),
            Some(Language::Other("ßharp".to_string()))
        );
    }

    #[test]
    fn unknown_tag_falls_back_to_capitalized_form() {
        assert_eq!(
            Language::normalize("JAVA"),
            Some(Language::Other("Java".to_string()))
        );
        assert_eq!(Language::normalize("c#").map(|l| l.to_string()).as_deref(), Some("C#"));
    }

    #[test]
    fn blank_tag_uses_caller_default() {
        assert_eq!(Language::normalize("   "), None);
        assert_eq!(Language::normalize_or("", Language::Rust), Language::Rust);
        assert_eq!(Language::normalize_or("go", Language::Rust), Language::Go);
    }

    #[test]
    fn file_kind_uses_suffix_only() {
        assert_eq!(file_kind("name.rs"), FileKind::Code(Some(Language::Rust)));
        assert_eq!(file_kind("main.c"), FileKind::Code(Some(Language::C)));
        assert_eq!(file_kind("main.cpp"), FileKind::Code(Some(Language::Cpp)));
        assert_eq!(file_kind("notes.txt"), FileKind::Pseudocode);
        assert_eq!(file_kind("main.pseudo"), FileKind::Pseudocode);
        assert_eq!(file_kind("Makefile"), FileKind::Code(None));
        assert_eq!(file_kind("data.json"), FileKind::Code(None));
    }
}
