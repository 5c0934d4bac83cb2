//! 品味图谱服务客户端（Qloo insights API）
//!
//! GET {base_url}?filter.type=urn:entity:{type}&take={limit}，鉴权走
//! X-Api-Key 请求头。响应 data[] 逐条映射为 Recommendation，描述字段取
//! description 或 bio，缺图时生成占位图 URL。失败退到本地样本表，
//! 因此 fetch 对管道永不返回 Err。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::core::PipelineError;
use crate::model::{EntityType, Recommendation};
use crate::recs::{samples, RecommendationSource};

/// Qloo insights 客户端：api_key 缺失时不发请求，直接走样本回退
pub struct QlooClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// 上游响应：data 数组之外的字段全部忽略
#[derive(Debug, Deserialize)]
struct InsightsResponse {
    #[serde(default)]
    data: Vec<InsightItem>,
}

#[derive(Debug, Deserialize)]
struct InsightItem {
    id: Option<String>,
    name: String,
    description: Option<String>,
    bio: Option<String>,
    rating: Option<f64>,
    year: Option<i32>,
    image_url: Option<String>,
}

impl QlooClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let api_key = std::env::var("QLOO_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("QLOO_API_KEY not set, recommendations will use local samples");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn insights_url(&self, kind: EntityType, limit: usize) -> String {
        format!(
            "{}?filter.type=urn:entity:{}&take={}",
            self.base_url,
            kind.as_str(),
            limit
        )
    }

    async fn call_api(
        &self,
        kind: EntityType,
        limit: usize,
    ) -> Result<Vec<Recommendation>, String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| "QLOO_API_KEY not set".to_string())?;

        let response = self
            .client
            .get(self.insights_url(kind, limit))
            .header("X-Api-Key", api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("upstream returned {}", status));
        }

        let data: InsightsResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid response body: {}", e))?;

        Ok(map_items(kind, data.data))
    }
}

/// data[] 条目映射：kind 统一取请求的类型，描述空缺时退 bio，缺图补占位图
fn map_items(kind: EntityType, items: Vec<InsightItem>) -> Vec<Recommendation> {
    items
        .into_iter()
        .map(|item| {
            let description = item
                .description
                .or(item.bio)
                .unwrap_or_default();
            let image_url = item.image_url.unwrap_or_else(|| {
                format!(
                    "https://via.placeholder.com/300x450?text={}",
                    item.name.replace(' ', "+")
                )
            });
            let mut rec = Recommendation::new(item.name, kind)
                .with_description(description)
                .with_image_url(image_url);
            rec.id = item.id;
            rec.rating = item.rating;
            rec.year = item.year;
            rec
        })
        .collect()
}

#[async_trait]
impl RecommendationSource for QlooClient {
    async fn fetch(
        &self,
        kind: EntityType,
        limit: usize,
    ) -> Result<Vec<Recommendation>, PipelineError> {
        match self.call_api(kind, limit).await {
            Ok(recs) => Ok(recs),
            Err(reason) => {
                tracing::warn!(kind = %kind, %reason, "taste graph unavailable, using local samples");
                Ok(samples::samples_for(kind, limit))
            }
        }
    }
}
