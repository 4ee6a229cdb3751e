// Groq explainer - 基于 Groq chat-completions 的解释/修复实现
// 所有失败都降级为占位文本，绝不向管线传播错误

use async_trait::async_trait;
use secaudit_core::{
    truncate_chars, Explainer, Explanation, EXPLAIN_EXCERPT_CHARS, FIX_EXCERPT_CHARS,
};
use std::time::Duration;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub struct GroqExplainer {
    client: reqwest::Client,
    api_key: String,
}

impl GroqExplainer {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    async fn chat(&self, system: &str, user: &str, max_tokens: u32) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "model": GROQ_MODEL,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": 0.3,
            "max_tokens": max_tokens,
        });

        let response = self
            .client
            .post(GROQ_API_URL)
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let value: serde_json::Value = response.json().await?;
        let text = value["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            anyhow::bail!("empty completion");
        }
        Ok(text)
    }
}

#[async_trait]
impl Explainer for GroqExplainer {
    async fn explain(&self, vulnerability: &str, code_excerpt: &str) -> Explanation {
        let prompt = format!(
            "Analyze this security vulnerability in under 80 words total:\n\n\
             Type: {}\n\
             Code: {}\n\n\
             Respond in exactly this format:\n\
             RISK: [Why this is dangerous - 1-2 sentences]\n\
             EXPLOIT: [How attacker exploits it - 1-2 sentences]\n\
             FIX: [Secure code fix example - brief]",
            vulnerability,
            truncate_chars(code_excerpt, EXPLAIN_EXCERPT_CHARS)
        );

        match self
            .chat("You are a security expert. Be concise.", &prompt, 200)
            .await
        {
            Ok(text) => parse_explanation(&text),
            Err(e) => {
                tracing::warn!("AI explanation failed: {}", e);
                Explanation {
                    risk: format!("AI explanation failed: {}", truncate_chars(&e.to_string(), 50)),
                    exploit: String::new(),
                    fix: String::new(),
                }
            }
        }
    }

    async fn generate_fix(&self, vulnerability: &str, code_excerpt: &str) -> String {
        let prompt = format!(
            "Rewrite this code to fix the {} vulnerability. \
             Respond with only the corrected code, no commentary:\n\n{}",
            vulnerability,
            truncate_chars(code_excerpt, FIX_EXCERPT_CHARS)
        );

        match self
            .chat("You are a security expert. Output code only.", &prompt, 300)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("AI fix generation failed: {}", e);
                String::new()
            }
        }
    }
}

/// 解析 RISK:/EXPLOIT:/FIX: 三段式回复
fn parse_explanation(text: &str) -> Explanation {
    let mut explanation = Explanation::default();

    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("RISK:") {
            explanation.risk = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("EXPLOIT:") {
            explanation.exploit = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("FIX:") {
            explanation.fix = rest.trim().to_string();
        }
    }

    explanation
}
