//! Model-backed producers: pseudocode transcription and the chat assistant.

use crate::error::Result;
use crate::response::fence;
use async_trait::async_trait;

pub mod llama;

pub use llama::LlamaClient;

const CHATML_END: &str = "<|im_end|>";

const TRANSCRIBE_SYSTEM_PROMPT: &str = "You are an expert coding assistant. Your task is to transcribe the given pseudocode into valid, runnable code in the most appropriate language.\nAnalyze the syntax and style to infer the target language (e.g., Python, JavaScript, Rust).\nOutput result in the format:\n```language\ncode\n```";

const CHAT_SYSTEM_PROMPT: &str =
    "You are an expert coding assistant for Pseudobench. Help the user interactively. Be concise.";

/// Language tag used when a transcription reply carries no fence tag.
const FALLBACK_TRANSCRIPTION_LANGUAGE: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    /// Raw tag as the model wrote it; normalized by the session.
    pub language: String,
    pub code: String,
}

/// One turn of the history sent to the chat model. `role` is `system`,
/// `user` or `assistant`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait Inference: Send + Sync {
    async fn transcribe(&self, pseudocode: &str) -> Result<Transcription>;

    /// Returns the raw assistant reply, fences and all.
    async fn chat(&self, history: &[ChatTurn]) -> Result<String>;
}

fn chatml_turn(prompt: &mut String, role: &str, content: &str) {
    prompt.push_str("<|im_start|>");
    prompt.push_str(role);
    prompt.push('\n');
    prompt.push_str(content);
    prompt.push('\n');
    prompt.push_str(CHATML_END);
    prompt.push('\n');
}

pub(crate) fn transcription_prompt(pseudocode: &str) -> String {
    let mut prompt = String::new();
    chatml_turn(&mut prompt, "system", TRANSCRIBE_SYSTEM_PROMPT);
    chatml_turn(&mut prompt, "user", pseudocode);
    prompt.push_str("<|im_start|>assistant\n");
    prompt
}

pub(crate) fn chat_prompt(history: &[ChatTurn]) -> String {
    let mut prompt = String::new();
    chatml_turn(&mut prompt, "system", CHAT_SYSTEM_PROMPT);
    for turn in history {
        chatml_turn(&mut prompt, &turn.role, &turn.content);
    }
    prompt.push_str("<|im_start|>assistant\n");
    prompt
}

/// Splits a transcription reply into tag and code. Without a fence the whole
/// reply is treated as code.
pub(crate) fn parse_transcription(content: &str) -> Transcription {
    match fence::extract(content) {
        Some(block) => {
            let tag = block.tag.trim();
            Transcription {
                language: if tag.is_empty() {
                    FALLBACK_TRANSCRIPTION_LANGUAGE.to_string()
                } else {
                    tag.to_string()
                },
                code: block.code.trim().to_string(),
            }
        }
        None => Transcription {
            language: FALLBACK_TRANSCRIPTION_LANGUAGE.to_string(),
            code: content.to_string(),
        },
    }
}

/// The system turn that gives the assistant the current editor contents.
pub fn editor_context_turn(
    pseudocode: &str,
    language: &str,
    generated_code: &str,
    question: &str,
) -> ChatTurn {
    ChatTurn::new(
        "system",
        format!(
            "Current Editor Context:\n\nPSEUDOCODE:\n{pseudocode}\n\nGENERATED CODE ({language}):\n{generated_code}\n\nUser Question: {question}"
        ),
    )
}
