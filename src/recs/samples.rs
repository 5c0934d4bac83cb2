//! 本地样本推荐表
//!
//! 上游品味图谱不可用时的终点兜底，也用于无网演示模式。
//! 按类型静态建表，limit 截断后返回；无样本的类型返回空列表。

use async_trait::async_trait;

use crate::core::PipelineError;
use crate::model::{EntityType, Recommendation};
use crate::recs::RecommendationSource;

/// 某类型的样本推荐，最多 limit 条
pub fn samples_for(kind: EntityType, limit: usize) -> Vec<Recommendation> {
    let mut recs = match kind {
        EntityType::Movie => vec![
            Recommendation::new("Inception", EntityType::Movie)
                .with_id("tt1375666")
                .with_description(
                    "A thief who steals corporate secrets through the use of dream-sharing \
                     technology is given the inverse task of planting an idea into the mind of a C.E.O.",
                )
                .with_rating(8.8)
                .with_year(2010)
                .with_image_url("https://via.placeholder.com/300x450?text=Inception"),
            Recommendation::new("Interstellar", EntityType::Movie)
                .with_id("tt0816692")
                .with_description(
                    "A team of explorers travel through a wormhole in space in an attempt \
                     to ensure humanity's survival.",
                )
                .with_rating(8.6)
                .with_year(2014)
                .with_image_url("https://via.placeholder.com/300x450?text=Interstellar"),
            Recommendation::new("The Shawshank Redemption", EntityType::Movie)
                .with_id("tt0111161")
                .with_description(
                    "Two imprisoned men bond over a number of years, finding solace and \
                     eventual redemption through acts of common decency.",
                )
                .with_rating(9.3)
                .with_year(1994)
                .with_image_url("https://via.placeholder.com/300x450?text=Shawshank+Redemption"),
        ],
        EntityType::Book => vec![
            Recommendation::new("Dune", EntityType::Book)
                .with_id("b1")
                .with_author("Frank Herbert")
                .with_description(
                    "A science fiction novel about the son of a noble family entrusted with \
                     the protection of the most valuable asset in the galaxy.",
                )
                .with_rating(4.2)
                .with_year(1965)
                .with_image_url("https://via.placeholder.com/300x450?text=Dune"),
            Recommendation::new("The Martian", EntityType::Book)
                .with_id("b2")
                .with_author("Andy Weir")
                .with_description(
                    "An astronaut becomes stranded on Mars and must find a way to survive.",
                )
                .with_rating(4.4)
                .with_year(2011)
                .with_image_url("https://via.placeholder.com/300x450?text=The+Martian"),
        ],
        EntityType::Artist => vec![
            Recommendation::new("Tame Impala", EntityType::Artist)
                .with_id("a1")
                .with_description(
                    "Australian musical project of multi-instrumentalist Kevin Parker known \
                     for psychedelic music.",
                )
                .with_genre("Psychedelic Pop")
                .with_image_url("https://via.placeholder.com/300x300?text=Tame+Impala"),
            Recommendation::new("Beach House", EntityType::Artist)
                .with_id("a2")
                .with_description(
                    "American dream pop band known for their dreamy, atmospheric sound.",
                )
                .with_genre("Dream Pop")
                .with_image_url("https://via.placeholder.com/300x300?text=Beach+House"),
        ],
        EntityType::TvShow => vec![Recommendation::new("Stranger Things", EntityType::TvShow)
            .with_id("tv1")
            .with_description(
                "When a young boy vanishes, a small town uncovers a mystery involving secret \
                 experiments, terrifying supernatural forces and one strange little girl.",
            )
            .with_rating(8.7)
            .with_year(2016)
            .with_image_url("https://via.placeholder.com/300x450?text=Stranger+Things")],
        EntityType::Place => vec![Recommendation::new("Central Park", EntityType::Place)
            .with_id("p1")
            .with_location("New York, NY")
            .with_description(
                "An urban park in Manhattan, New York City, between the Upper West and \
                 Upper East Sides of Manhattan.",
            )
            .with_image_url("https://via.placeholder.com/300x200?text=Central+Park")],
        _ => Vec::new(),
    };
    recs.truncate(limit);
    recs
}

/// 纯样本数据源：确定性返回本地样本，永不失败
#[derive(Debug, Default)]
pub struct SampleSource;

impl SampleSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RecommendationSource for SampleSource {
    async fn fetch(
        &self,
        kind: EntityType,
        limit: usize,
    ) -> Result<Vec<Recommendation>, PipelineError> {
        Ok(samples_for(kind, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_truncates() {
        assert_eq!(samples_for(EntityType::Movie, 2).len(), 2);
        assert_eq!(samples_for(EntityType::Movie, 10).len(), 3);
    }

    #[test]
    fn test_kind_matches_key() {
        for kind in EntityType::ALL {
            for rec in samples_for(kind, 5) {
                assert_eq!(rec.kind, kind);
            }
        }
    }

    #[test]
    fn test_unsampled_kind_is_empty() {
        assert!(samples_for(EntityType::Podcast, 5).is_empty());
        assert!(samples_for(EntityType::Brand, 5).is_empty());
    }

    #[test]
    fn test_samples_carry_stable_ids() {
        let movies = samples_for(EntityType::Movie, 3);
        assert_eq!(movies[0].id.as_deref(), Some("tt1375666"));
        let books = samples_for(EntityType::Book, 2);
        assert_eq!(books[0].author.as_deref(), Some("Frank Herbert"));
    }
}
