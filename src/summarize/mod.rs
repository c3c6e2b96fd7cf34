// src/summarize/mod.rs
//! Summarizer client: one chat-completion call per run.

pub mod policy;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{AppConfig, DEFAULT_MODEL, DEFAULT_OPENAI_BASE_URL, ENV_API_KEY, SUMMARY_MAX_TOKENS};
use crate::error::SummarizeError;

/// Text in, prose out.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, digest: &str) -> Result<String, SummarizeError>;
    fn provider_name(&self) -> &'static str;
}

/// OpenAI Chat Completions. The response text is returned verbatim.
pub struct OpenAiSummarizer {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    policy: String,
    max_tokens: u32,
}

impl OpenAiSummarizer {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, SummarizeError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("pop-culture-digest/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .map_err(SummarizeError::service)?;
        Ok(Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            policy: policy::ROUNDUP_POLICY.to_string(),
            max_tokens: SUMMARY_MAX_TOKENS,
        })
    }

    pub fn from_config(cfg: &AppConfig, policy_text: String) -> Result<Self, SummarizeError> {
        Ok(Self::new(cfg.api_key.clone(), cfg.summary_timeout)?
            .with_model(&cfg.model)
            .with_base_url(&cfg.openai_base_url)
            .with_policy(policy_text))
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_policy(mut self, policy: String) -> Self {
        self.policy = policy;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, digest: &str) -> Result<String, SummarizeError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SummarizeError::Authentication { var: ENV_API_KEY })?;

        let user = policy::user_message(digest);
        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: &self.policy,
                },
                Msg {
                    role: "user",
                    content: &user,
                },
            ],
            max_tokens: self.max_tokens,
        };

        tracing::info!(
            model = %self.model,
            digest_chars = digest.chars().count(),
            "requesting summary"
        );

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&req)
            .send()
            .await
            .map_err(SummarizeError::service)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SummarizeError::service(anyhow::anyhow!(
                "HTTP {}: {}",
                status,
                body.trim()
            )));
        }

        let body: Resp = resp.json().await.map_err(SummarizeError::service)?;
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SummarizeError::service(anyhow::anyhow!("response had no choices")))?;
        Ok(choice.message.content.unwrap_or_default())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
