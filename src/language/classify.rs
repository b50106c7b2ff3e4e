//! Substring-signature language detection.
//!
//! Signatures overlap (a Go program can satisfy the Python rule), so the table
//! is ordered and the first hit wins.

use super::Language;

/// Which signature rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureSet {
    /// Assistant replies without a fence tag. Includes the JavaScript rule.
    Chat,
    /// Pre-execution correction. Stops after the Python rule.
    Dispatch,
}

enum Rule {
    All(&'static [&'static str]),
    Any(&'static [&'static str]),
}

impl Rule {
    fn matches(&self, code: &str) -> bool {
        match self {
            Self::All(needles) => needles.iter().all(|needle| code.contains(needle)),
            Self::Any(needles) => needles.iter().any(|needle| code.contains(needle)),
        }
    }
}

struct Signature {
    language: Language,
    rule: Rule,
    chat_only: bool,
}

fn signatures() -> [Signature; 5] {
    [
        Signature {
            language: Language::Go,
            rule: Rule::All(&["package main", "func main"]),
            chat_only: false,
        },
        Signature {
            language: Language::Cpp,
            rule: Rule::All(&["#include", "int main"]),
            chat_only: false,
        },
        Signature {
            language: Language::Rust,
            rule: Rule::All(&["fn main", "println!"]),
            chat_only: false,
        },
        Signature {
            language: Language::Python,
            rule: Rule::All(&["def ", ":"]),
            chat_only: false,
        },
        Signature {
            language: Language::JavaScript,
            rule: Rule::Any(&["console.log", "const ", "let "]),
            chat_only: true,
        },
    ]
}

/// Best-effort guess of the language `code` is written in; `None` when no
/// signature matches.
pub fn classify(code: &str, set: SignatureSet) -> Option<Language> {
    signatures()
        .into_iter()
        .filter(|signature| set == SignatureSet::Chat || !signature.chat_only)
        .find(|signature| signature.rule.matches(code))
        .map(|signature| signature.language)
}

#[cfg(test)]
mod tests {
    use super::{classify, SignatureSet};
    use crate::language::Language;

    #[test]
    fn go_wins_over_python_when_both_match() {
        let code = "package main\n\n// def helper: unused\nfunc main() {}\n";
        assert_eq!(classify(code, SignatureSet::Dispatch), Some(Language::Go));
        assert_eq!(classify(code, SignatureSet::Chat), Some(Language::Go));
    }

    #[test]
    fn detects_each_signature() {
        assert_eq!(
            classify("#include <iostream>\nint main() { return 0; }", SignatureSet::Dispatch),
            Some(Language::Cpp)
        );
        assert_eq!(
            classify("fn main() {\n    println!(\"hi\");\n}", SignatureSet::Dispatch),
            Some(Language::Rust)
        );
        assert_eq!(
            classify("def add(a, b):\n    return a + b", SignatureSet::Dispatch),
            Some(Language::Python)
        );
    }

    #[test]
    fn javascript_rule_only_applies_to_chat_set() {
        let code = "const total = 3;\nconsole.log(total);";
        assert_eq!(classify(code, SignatureSet::Chat), Some(Language::JavaScript));
        assert_eq!(classify(code, SignatureSet::Dispatch), None);
    }

    #[test]
    fn python_outranks_javascript_in_chat_set() {
        let code = "def f():\n    let_me = 1\n    let x = 2";
        assert_eq!(classify(code, SignatureSet::Chat), Some(Language::Python));
    }

    #[test]
    fn cpp_outranks_rust_when_both_match() {
        let code = "#include <cstdio>\n// fn main in rust uses println!\nint main() { return 0; }";
        assert_eq!(classify(code, SignatureSet::Dispatch), Some(Language::Cpp));
        assert_eq!(classify(code, SignatureSet::Chat), Some(Language::Cpp));
    }

    #[test]
    fn plain_text_is_unknown() {
        assert_eq!(classify("hello world", SignatureSet::Chat), None);
        assert_eq!(classify("", SignatureSet::Dispatch), None);
    }

    #[test]
    fn partial_signature_does_not_match() {
        assert_eq!(classify("fn main() {}", SignatureSet::Dispatch), None);
        assert_eq!(classify("package main", SignatureSet::Dispatch), None);
    }
}
