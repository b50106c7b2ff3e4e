use regex::Regex;
use std::sync::LazyLock;

const FENCE: &str = "```";

/// A language tag: the first word of an opening fence's info string.
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"^[A-Za-z0-9+#-]+$") {
    Ok(regex) => regex,
    Err(err) => panic!("invalid fence tag pattern: {err}"),
});

/// The first fenced region of a text and what surrounds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    pub tag: &'a str,
    pub code: &'a str,
    pub before: &'a str,
    pub after: &'a str,
}

impl FencedBlock<'_> {
    /// Text outside the region, joined and trimmed. Later fenced regions stay
    /// in here untouched.
    pub fn residual(&self) -> String {
        format!("{}{}", self.before, self.after).trim().to_string()
    }
}

/// Fences pair up in order: an opening fence line, then the body up to the
/// next fence. A line holding more backticks after its fence is inline code
/// and skipped whole. The tag is the info string's first word when it fits the tag
/// alphabet; anything else on the line is ignored.
pub fn extract(text: &str) -> Option<FencedBlock<'_>> {
    let mut search_from = 0;
    loop {
        let open = search_from + text[search_from..].find(FENCE)?;
        let info_start = open + FENCE.len();
        let line_end = info_start + text[info_start..].find('\n')?;
        let info = &text[info_start..line_end];
        if info.contains('`') {
            search_from = line_end;
            continue;
        }

        let body_start = line_end + 1;
        let close = body_start + text[body_start..].find(FENCE)?;
        let tag = info
            .split_whitespace()
            .next()
            .filter(|word| TAG_REGEX.is_match(word))
            .unwrap_or("");

        return Some(FencedBlock {
            tag,
            code: &text[body_start..close],
            before: &text[..open],
            after: &text[close + FENCE.len()..],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::extract;

    #[test]
    fn no_fence_is_no_match() {
        assert!(extract("just some prose").is_none());
        assert!(extract("an unterminated ```python\nprint(1)").is_none());
    }

    #[test]
    fn captures_tag_code_and_surroundings() {
        let block = extract("Here you go:\n```rust\nfn main() {}\n```\nEnjoy.")
            .expect("fenced block should be found");
        assert_eq!(block.tag, "rust");
        assert_eq!(block.code, "fn main() {}\n");
        assert_eq!(block.before, "Here you go:\n");
        assert_eq!(block.after, "\nEnjoy.");
        assert_eq!(block.residual(), "Here you go:\n\nEnjoy.");
    }

    #[test]
    fn admits_symbolic_tags() {
        let block = extract("```c++\nint main() {}\n```").expect("c++ block");
        assert_eq!(block.tag, "c++");
        let block = extract("``` c# \nclass A {}\n```").expect("c# block");
        assert_eq!(block.tag, "c#");
        assert_eq!(block.code, "class A {}\n");
    }

    #[test]
    fn untagged_fence_keeps_first_code_line_in_body() {
        let block = extract("```\nmain\nrest\n```").expect("untagged block");
        assert_eq!(block.tag, "");
        assert_eq!(block.code, "main\nrest\n");
    }

    #[test]
    fn extra_info_after_tag_still_pairs_fences_in_order() {
        let text = "Option A:\n```python title=demo\nx = 1\n```\nOption B text\n```js\nlet y = 2;\n```";
        let block = extract(text).expect("first block");
        assert_eq!(block.tag, "python");
        assert_eq!(block.code, "x = 1\n");
        assert_eq!(block.before, "Option A:\n");
        assert!(block.after.starts_with("\nOption B text\n```js"));
    }

    #[test]
    fn info_outside_tag_alphabet_gives_empty_tag() {
        let block = extract("```{.python}\nprint(1)\n```").expect("block");
        assert_eq!(block.tag, "");
        assert_eq!(block.code, "print(1)\n");
    }

    #[test]
    fn inline_backticks_are_not_an_opening_fence() {
        let block = extract("Use ```x``` inline.\n```go\npackage main\n```").expect("block");
        assert_eq!(block.tag, "go");
        assert_eq!(block.code, "package main\n");
    }

    #[test]
    fn crlf_fence_lines_are_accepted() {
        let block = extract("```rust\r\nfn main() {}\r\n```").expect("block");
        assert_eq!(block.tag, "rust");
        assert_eq!(block.code, "fn main() {}\r\n");
    }

    #[test]
    fn only_first_region_is_taken() {
        let text = "A\n```py\nx = 1\n```\nB\n```js\nlet y = 2;\n```";
        let block = extract(text).expect("first block");
        assert_eq!(block.tag, "py");
        assert_eq!(block.code, "x = 1\n");
        assert!(block.residual().contains("```js\nlet y = 2;\n```"));
    }
}
