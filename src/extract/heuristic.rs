//! 本地启发式分析器：关键词规则匹配
//!
//! 上游语言分析服务不可用时的终点兜底：固定规则集做关键词匹配，
//! 永远返回非空的实体列表与分析语，且为命中的类别附带内联样本推荐。
//! 此组件不会失败。

use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::PipelineError;
use crate::extract::{EntityExtractor, Extraction};
use crate::model::{EntityType, ExtractedEntity, Recommendation};

/// 关键词规则分析器
#[derive(Debug, Default)]
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// 同步分析入口（GeminiExtractor 的回退路径直接调用）
    pub fn analyze(&self, text: &str) -> Extraction {
        let lower = text.to_lowercase();
        let mut entities = Vec::new();
        let mut analysis = String::new();

        if lower.contains("sci-fi") || lower.contains("science fiction") {
            entities.push(ExtractedEntity {
                kind: EntityType::Movie,
                name: "Sci-Fi Movies".to_string(),
            });
            analysis.push_str("I see you're interested in science fiction. ");
        }

        if lower.contains("indie") && (lower.contains("music") || lower.contains("band")) {
            entities.push(ExtractedEntity {
                kind: EntityType::Artist,
                name: "Indie Music".to_string(),
            });
            analysis.push_str("You seem to enjoy indie music. ");
        }

        if lower.contains("mystery") && (lower.contains("book") || lower.contains("novel")) {
            entities.push(ExtractedEntity {
                kind: EntityType::Book,
                name: "Mystery Books".to_string(),
            });
            analysis.push_str("Mystery books are a great choice! ");
        }

        if lower.contains("new york")
            && (lower.contains("restaurant") || lower.contains("food") || lower.contains("eat"))
        {
            entities.push(ExtractedEntity {
                kind: EntityType::Place,
                name: "New York Restaurants".to_string(),
            });
            analysis.push_str("Looking for great places to eat in New York? ");
        }

        if entities.is_empty() {
            entities = vec![
                ExtractedEntity {
                    kind: EntityType::Movie,
                    name: "Popular Movies".to_string(),
                },
                ExtractedEntity {
                    kind: EntityType::Book,
                    name: "Bestselling Books".to_string(),
                },
                ExtractedEntity {
                    kind: EntityType::Artist,
                    name: "Trending Artists".to_string(),
                },
            ];
            analysis = "Here are some general recommendations based on your interests. \
                        You can be more specific to get personalized suggestions!"
                .to_string();
        } else {
            analysis.push_str("Here are some recommendations based on your interests.");
        }

        let inline = inline_samples(&entities);
        Extraction {
            entities,
            analysis,
            inline,
        }
    }
}

#[async_trait]
impl EntityExtractor for HeuristicAnalyzer {
    async fn extract(&self, text: &str) -> Result<Extraction, PipelineError> {
        Ok(self.analyze(text))
    }
}

/// 命中实体名对应的内联样本（按实体类型入表）
fn inline_samples(entities: &[ExtractedEntity]) -> HashMap<EntityType, Vec<Recommendation>> {
    let mut map = HashMap::new();
    for entity in entities {
        if let Some(recs) = samples_for(&entity.name.to_lowercase()) {
            map.insert(entity.kind, recs);
        }
    }
    map
}

fn samples_for(name: &str) -> Option<Vec<Recommendation>> {
    match name {
        "sci-fi movies" => Some(vec![
            Recommendation::new("Dune", EntityType::Movie)
                .with_description("A science fiction novel by Frank Herbert"),
            Recommendation::new("The Matrix", EntityType::Movie)
                .with_description("A computer hacker learns about the true nature of reality"),
            Recommendation::new("The Expanse", EntityType::TvShow)
                .with_description("A thriller set two hundred years in the future"),
        ]),
        "indie music" => Some(vec![
            Recommendation::new("Tame Impala", EntityType::Artist)
                .with_description("Australian musical project of multi-instrumentalist Kevin Parker"),
            Recommendation::new("Beach House", EntityType::Artist)
                .with_description("American dream pop band from Baltimore, Maryland"),
        ]),
        "mystery books" => Some(vec![
            Recommendation::new("Gone Girl", EntityType::Book)
                .with_author("Gillian Flynn")
                .with_description("A woman disappears on her fifth wedding anniversary"),
            Recommendation::new("The Girl with the Dragon Tattoo", EntityType::Book)
                .with_author("Stieg Larsson")
                .with_description("A journalist and a hacker investigate a 40-year-old disappearance"),
        ]),
        "new york restaurants" => Some(vec![
            Recommendation::new("Katz's Delicatessen", EntityType::Place)
                .with_description("Iconic Jewish deli known for its pastrami on rye"),
            Recommendation::new("Le Bernardin", EntityType::Place)
                .with_description("Upscale French seafood restaurant"),
        ]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sci_fi_and_indie_both_match() {
        let extraction = HeuristicAnalyzer::new().analyze("I love sci-fi movies and indie music");
        let kinds: Vec<EntityType> = extraction.entities.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&EntityType::Movie));
        assert!(kinds.contains(&EntityType::Artist));
        assert!(!extraction.analysis.is_empty());
        assert!(extraction.inline.contains_key(&EntityType::Movie));
        assert!(extraction.inline.contains_key(&EntityType::Artist));
    }

    #[test]
    fn test_no_match_yields_generic_trio() {
        let extraction = HeuristicAnalyzer::new().analyze("hello there");
        assert_eq!(extraction.entities.len(), 3);
        let kinds: Vec<EntityType> = extraction.entities.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EntityType::Movie, EntityType::Book, EntityType::Artist]
        );
        assert!(extraction.analysis.contains("general recommendations"));
        // 通用三元组没有内联样本，走 fetch 路径
        assert!(extraction.inline.is_empty());
    }

    #[test]
    fn test_mystery_requires_book_context() {
        let none = HeuristicAnalyzer::new().analyze("a mystery to me");
        assert!(!none
            .entities
            .iter()
            .any(|e| e.name == "Mystery Books"));

        let hit = HeuristicAnalyzer::new().analyze("I enjoy mystery novels");
        assert!(hit.entities.iter().any(|e| e.kind == EntityType::Book));
    }

    #[test]
    fn test_new_york_food_matches_place() {
        let extraction = HeuristicAnalyzer::new().analyze("best food in New York?");
        assert!(extraction
            .entities
            .iter()
            .any(|e| e.kind == EntityType::Place));
        assert!(extraction.inline.contains_key(&EntityType::Place));
    }

    #[test]
    fn test_analysis_never_empty() {
        for text in ["", "xyz", "sci-fi", "indie band"] {
            let extraction = HeuristicAnalyzer::new().analyze(text);
            assert!(!extraction.analysis.is_empty());
            assert!(!extraction.entities.is_empty());
        }
    }
}
