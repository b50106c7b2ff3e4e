use super::{chat_prompt, parse_transcription, transcription_prompt, ChatTurn, Inference, Transcription, CHATML_END};
use crate::config::InferenceConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Client for a local llama.cpp server's `/completion` endpoint.
#[derive(Clone)]
pub struct LlamaClient {
    http: reqwest::Client,
    config: InferenceConfig,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: u32,
    temperature: f32,
    stop: [&'static str; 1],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    content: String,
}

impl LlamaClient {
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    fn completion_url(&self) -> String {
        format!("{}/completion", self.config.server_url.trim_end_matches('/'))
    }

    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String> {
        let request = CompletionRequest {
            prompt,
            n_predict: self.config.n_predict,
            temperature,
            stop: [CHATML_END],
        };

        debug!(url = %self.completion_url(), temperature, "requesting completion");
        let response = self
            .http
            .post(self.completion_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Server { status });
        }

        let completion: CompletionResponse = response.json().await?;
        Ok(completion.content)
    }
}

#[async_trait]
impl Inference for LlamaClient {
    async fn transcribe(&self, pseudocode: &str) -> Result<Transcription> {
        let prompt = transcription_prompt(pseudocode);
        let content = self
            .complete(&prompt, self.config.transcribe_temperature)
            .await?;
        Ok(parse_transcription(&content))
    }

    async fn chat(&self, history: &[ChatTurn]) -> Result<String> {
        let prompt = chat_prompt(history);
        self.complete(&prompt, self.config.chat_temperature).await
    }
}
