//! 管道集成测试
//!
//! 用脚本化抽取器与计数推荐源驱动完整管道，覆盖提交、重试、清空、
//! 过滤器派生与错误路径的端到端行为。

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use tastesphere::core::{Phase, Pipeline, PipelineError};
    use tastesphere::extract::{EntityExtractor, Extraction, HeuristicAnalyzer};
    use tastesphere::model::{EntityType, ExtractedEntity, Recommendation, Role};
    use tastesphere::recs::RecommendationSource;
    use tastesphere::store::Filter;

    /// 按预排脚本逐次返回结果的抽取器；脚本耗尽后一律失败
    struct ScriptedExtractor {
        script: Mutex<VecDeque<Result<Extraction, String>>>,
    }

    impl ScriptedExtractor {
        fn new(script: Vec<Result<Extraction, String>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
            }
        }
    }

    #[async_trait::async_trait]
    impl EntityExtractor for ScriptedExtractor {
        async fn extract(&self, _text: &str) -> Result<Extraction, PipelineError> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err("script exhausted".to_string()))
                .map_err(PipelineError::Extraction)
        }
    }

    /// 每次调用返回一条带序号的推荐并计数
    struct CountingSource {
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl RecommendationSource for CountingSource {
        async fn fetch(
            &self,
            kind: EntityType,
            _limit: usize,
        ) -> Result<Vec<Recommendation>, PipelineError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(vec![Recommendation::new(format!("{}-{}", kind, n), kind)])
        }
    }

    /// 一律失败的推荐源（生产实现不会这样，用于验证错误路径）
    struct FailingSource;

    #[async_trait::async_trait]
    impl RecommendationSource for FailingSource {
        async fn fetch(
            &self,
            _kind: EntityType,
            _limit: usize,
        ) -> Result<Vec<Recommendation>, PipelineError> {
            Err(PipelineError::Fetch("boom".to_string()))
        }
    }

    fn extraction_with(entities: &[(EntityType, &str)]) -> Extraction {
        Extraction {
            entities: entities
                .iter()
                .map(|(kind, name)| ExtractedEntity {
                    kind: *kind,
                    name: name.to_string(),
                })
                .collect(),
            analysis: "Here is what I found.".to_string(),
            inline: Default::default(),
        }
    }

    fn pipeline_with_script(script: Vec<Result<Extraction, String>>) -> Pipeline {
        Pipeline::new(
            Arc::new(ScriptedExtractor::new(script)),
            Arc::new(CountingSource::new()),
        )
    }

    #[tokio::test]
    async fn test_user_message_lands_before_any_async_work() {
        let mut pipeline =
            pipeline_with_script(vec![Ok(extraction_with(&[(EntityType::Movie, "Movies")]))]);

        assert!(pipeline.begin_submit("I like movies"));
        let messages = pipeline.conversation().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "I like movies");

        pipeline.finish().await;
        assert_eq!(pipeline.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_successful_run_appends_analysis_then_summary() {
        let mut pipeline = pipeline_with_script(vec![Ok(extraction_with(&[
            (EntityType::Movie, "Sci-Fi Movies"),
            (EntityType::Artist, "Indie Music"),
        ]))]);

        pipeline.submit("sci-fi and indie").await;

        let messages = pipeline.conversation().messages();
        assert_eq!(messages.len(), 3);
        assert!(messages[1].is_analysis);
        assert_eq!(
            messages[2].content,
            "I found 2 categories of recommendations for you!"
        );
        // 过滤器从 All 跟随首个实体类型
        assert_eq!(pipeline.filter(), Filter::Kind(EntityType::Movie));
        assert_eq!(pipeline.index().entities().len(), 2);
    }

    #[tokio::test]
    async fn test_guard_released_after_success_and_failure() {
        let mut pipeline = pipeline_with_script(vec![
            Err("upstream down".to_string()),
            Ok(extraction_with(&[(EntityType::Book, "Books")])),
        ]);

        pipeline.submit("first").await;
        assert_eq!(pipeline.phase(), Phase::Idle);
        pipeline.submit("second").await;
        assert_eq!(pipeline.phase(), Phase::Idle);
        // 两次提交都被接受并完成
        assert!(pipeline.index().get(EntityType::Book).is_some());
    }

    #[tokio::test]
    async fn test_retry_replaces_exactly_one_assistant_message() {
        let mut pipeline = pipeline_with_script(vec![
            Err("first attempt fails".to_string()),
            Ok(extraction_with(&[(EntityType::Movie, "Movies")])),
        ]);

        pipeline.submit("movies please").await;
        {
            let messages = pipeline.conversation().messages();
            assert_eq!(messages.len(), 2);
            assert!(messages[1].is_error);
        }

        pipeline.retry().await;
        let messages = pipeline.conversation().messages();
        // 错误消息被移除，重试产出分析 + 总结；用户消息不重复
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::User);
        assert!(messages.iter().all(|m| !m.is_error));
        assert!(messages[1].is_analysis);
    }

    #[tokio::test]
    async fn test_retry_without_prior_submission_is_noop() {
        let mut pipeline = pipeline_with_script(vec![]);
        pipeline.retry().await;
        assert!(pipeline.conversation().is_empty());
        assert_eq!(pipeline.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_error_path_leaves_index_and_filter_untouched() {
        let mut pipeline = pipeline_with_script(vec![
            Ok(extraction_with(&[(EntityType::Movie, "Movies")])),
            Err("later failure".to_string()),
        ]);

        pipeline.submit("movies").await;
        let before_lists: Vec<_> = pipeline.index().select_visible(Filter::All);
        let before_filter = pipeline.filter();
        assert!(!before_lists.is_empty());

        pipeline.submit("books").await;
        // 失败运行只追加一条错误消息，索引与过滤器保持运行前的值
        assert_eq!(pipeline.index().select_visible(Filter::All), before_lists);
        assert_eq!(pipeline.filter(), before_filter);
        assert!(pipeline.conversation().last().is_some_and(|m| m.is_error));
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_as_single_error_message() {
        let mut pipeline = Pipeline::new(
            Arc::new(ScriptedExtractor::new(vec![Ok(extraction_with(&[(
                EntityType::Movie,
                "Movies",
            )]))])),
            Arc::new(FailingSource),
        );

        pipeline.submit("movies").await;
        let messages = pipeline.conversation().messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].is_error);
        assert!(pipeline.index().is_empty());
        assert_eq!(pipeline.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_empty_submission_appends_nothing() {
        let mut pipeline = pipeline_with_script(vec![]);
        pipeline.submit("").await;
        pipeline.submit("   \t ").await;
        assert!(pipeline.conversation().is_empty());
        assert_eq!(pipeline.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_heuristic_extractor_end_to_end() {
        let source = Arc::new(CountingSource::new());
        let mut pipeline = Pipeline::new(Arc::new(HeuristicAnalyzer::new()), source.clone());

        pipeline.submit("I love sci-fi movies and indie music").await;

        let kinds: Vec<EntityType> = pipeline.index().entities().iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&EntityType::Movie));
        assert!(kinds.contains(&EntityType::Artist));

        let messages = pipeline.conversation().messages();
        assert_eq!(messages.len(), 3);
        assert!(!messages[1].content.is_empty());
        // 命中规则的类型走内联样本，不触发拉取
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert!(pipeline
            .index()
            .get(EntityType::Movie)
            .is_some_and(|recs| !recs.is_empty()));
    }

    #[tokio::test]
    async fn test_select_all_matches_per_type_concat_after_runs() {
        let mut pipeline = pipeline_with_script(vec![
            Ok(extraction_with(&[(EntityType::Movie, "Movies")])),
            Ok(extraction_with(&[(EntityType::Book, "Books")])),
        ]);

        pipeline.submit("movies").await;
        pipeline.submit("books").await;

        // 第一轮的 movie 键在第二轮后保留
        let all = pipeline.index().select_visible(Filter::All);
        let mut concat = Vec::new();
        for kind in [EntityType::Movie, EntityType::Book] {
            concat.extend(pipeline.index().select_visible(Filter::Kind(kind)));
        }
        assert_eq!(all, concat);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_kind_in_one_run_keeps_single_list() {
        let mut pipeline = pipeline_with_script(vec![Ok(extraction_with(&[
            (EntityType::Movie, "Action Movies"),
            (EntityType::Movie, "Film Noir"),
        ]))]);

        pipeline.submit("movies twice").await;
        let movies = pipeline.index().select_visible(Filter::Kind(EntityType::Movie));
        assert_eq!(movies.len(), 1);
        assert_eq!(pipeline.index().entities().len(), 2);
    }

    #[tokio::test]
    async fn test_absent_filter_key_selects_empty() {
        let mut pipeline =
            pipeline_with_script(vec![Ok(extraction_with(&[(EntityType::Movie, "Movies")]))]);
        pipeline.submit("movies").await;

        pipeline.set_filter(Filter::Kind(EntityType::Book));
        assert!(pipeline.index().select_visible(pipeline.filter()).is_empty());
    }

    #[tokio::test]
    async fn test_specific_filter_survives_later_runs() {
        let mut pipeline = pipeline_with_script(vec![
            Ok(extraction_with(&[(EntityType::Movie, "Movies")])),
            Ok(extraction_with(&[(EntityType::Book, "Books")])),
        ]);

        pipeline.submit("movies").await;
        assert_eq!(pipeline.filter(), Filter::Kind(EntityType::Movie));
        // 用户已选的具体过滤器不被后续运行覆盖
        pipeline.submit("books").await;
        assert_eq!(pipeline.filter(), Filter::Kind(EntityType::Movie));
    }

    #[tokio::test]
    async fn test_clear_all_resets_every_surface() {
        let mut pipeline =
            pipeline_with_script(vec![Ok(extraction_with(&[(EntityType::Movie, "Movies")]))]);
        pipeline.submit("movies").await;

        pipeline.clear_all();
        let snapshot = pipeline.snapshot();
        assert!(snapshot.messages.is_empty());
        assert!(snapshot.entities.is_empty());
        assert!(snapshot.visible.is_empty());
        assert!(snapshot.kinds.is_empty());
        assert_eq!(snapshot.filter, Filter::All);
    }
}
