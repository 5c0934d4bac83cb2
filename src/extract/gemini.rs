//! 语言分析服务客户端（Google Generative Language API）
//!
//! POST {base_url}/models/{model}:generateContent?key={api_key}，要求模型
//! 仅返回 JSON 对象；响应文本先剥离 markdown 代码围栏，再用正则截取最外层
//! `{...}` 后反序列化。网络、解析、校验任一环节失败都退到 HeuristicAnalyzer，
//! 因此 extract 对调用方永不返回 Err。

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::core::PipelineError;
use crate::extract::{EntityExtractor, Extraction, HeuristicAnalyzer, FALLBACK_ANALYSIS};
use crate::model::{EntityType, ExtractedEntity};

/// Generative Language API 客户端：持有 reqwest Client 与端点参数，
/// api_key 缺失时不发请求，直接走回退
pub struct GeminiExtractor {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    /// 截取响应文本中最外层 JSON 对象
    json_object: Regex,
    fallback: HeuristicAnalyzer,
}

/// 上游响应的逐层包装：candidates[0].content.parts[0].text
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// 模型输出的 JSON 载荷（校验前）
#[derive(Debug, Deserialize)]
struct Payload {
    entities: Vec<PayloadEntity>,
    analysis: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PayloadEntity {
    #[serde(rename = "type")]
    kind: String,
    name: String,
}

impl GeminiExtractor {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set, entity extraction will use local heuristics");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            json_object: Regex::new(r"\{[\s\S]*\}").unwrap(),
            fallback: HeuristicAnalyzer::new(),
        }
    }

    fn build_prompt(text: &str) -> String {
        format!(
            "Analyze the following text and extract entities with their types \
             (movie, book, artist, tv_show, podcast, place, brand, person, destination).\n\
             Return a valid JSON object with two fields:\n\
             1. \"entities\": an array of objects with \"type\" and \"name\" properties\n\
             2. \"analysis\": a friendly explanation of the user's interests\n\n\
             Example response:\n\
             {{\n\
               \"entities\": [\n\
                 {{\"type\": \"movie\", \"name\": \"Inception\"}},\n\
                 {{\"type\": \"book\", \"name\": \"Dune\"}}\n\
               ],\n\
               \"analysis\": \"You seem to enjoy science fiction content, particularly movies and books with complex narratives.\"\n\
             }}\n\n\
             Text to analyze: \"{text}\"\n\n\
             Respond with only the JSON object, no additional text or markdown formatting."
        )
    }

    /// 调用上游并解析；任何一步失败都返回 Err，由 extract 统一转回退
    async fn call_api(&self, text: &str) -> Result<Extraction, String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| "GEMINI_API_KEY not set".to_string())?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": Self::build_prompt(text) }] }],
            "generationConfig": {
                "temperature": 0.2,
                "topP": 0.8,
                "topK": 40
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(format!("upstream returned {}: {}", status, detail));
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid response body: {}", e))?;

        let content = data
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
            .unwrap_or("{}");

        self.parse_payload(content)
    }

    /// 清洗并反序列化模型输出：剥围栏、截取对象、丢弃未知类型实体
    fn parse_payload(&self, content: &str) -> Result<Extraction, String> {
        let mut cleaned = content.trim();
        if let Some(inner) = cleaned.strip_prefix("```json") {
            cleaned = inner.trim_end_matches("```").trim();
        } else if let Some(inner) = cleaned.strip_prefix("```") {
            cleaned = inner.trim_end_matches("```").trim();
        }
        let cleaned = match self.json_object.find(cleaned) {
            Some(m) => m.as_str(),
            None => cleaned,
        };

        let payload: Payload =
            serde_json::from_str(cleaned).map_err(|e| format!("unparseable payload: {}", e))?;

        let entities: Vec<ExtractedEntity> = payload
            .entities
            .into_iter()
            .filter_map(|e| match EntityType::from_str(&e.kind) {
                Ok(kind) => Some(ExtractedEntity { kind, name: e.name }),
                Err(_) => {
                    tracing::warn!(kind = %e.kind, name = %e.name, "dropping entity of unknown type");
                    None
                }
            })
            .collect();

        let analysis = payload
            .analysis
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_ANALYSIS.to_string());

        Ok(Extraction {
            entities,
            analysis,
            inline: Default::default(),
        })
    }
}

#[async_trait]
impl EntityExtractor for GeminiExtractor {
    async fn extract(&self, text: &str) -> Result<Extraction, PipelineError> {
        match self.call_api(text).await {
            Ok(extraction) => Ok(extraction),
            Err(reason) => {
                tracing::warn!(%reason, "language analysis unavailable, using local heuristics");
                Ok(self.fallback.analyze(text))
            }
        }
    }
}
