//! 编排器集成测试
//!
//! 不设 API 密钥时两级上游都走本地兜底，整条链路离线可测：
//! Submit 经命令通道驱动管道，断言 watch 通道最终回到 Idle 且转录完整。

#[cfg(test)]
mod tests {
    use tastesphere::core::{create_app, Command, Phase};
    use tastesphere::model::Role;
    use tastesphere::store::Filter;
    use tokio::time::{timeout, Duration};

    async fn wait_for_idle_with_messages(
        state_rx: &mut tokio::sync::watch::Receiver<tastesphere::core::UiState>,
        min_messages: usize,
    ) -> tastesphere::core::UiState {
        let deadline = Duration::from_secs(30);
        loop {
            {
                let state = state_rx.borrow();
                if state.phase == Phase::Idle && state.messages.len() >= min_messages {
                    return state.clone();
                }
            }
            timeout(deadline, state_rx.changed())
                .await
                .expect("state update timed out")
                .expect("state channel closed");
        }
    }

    #[tokio::test]
    async fn test_submit_command_drives_pipeline_to_completion() {
        let (cmd_tx, mut state_rx) = create_app(None).await.unwrap();

        cmd_tx
            .send(Command::Submit("I love sci-fi movies and indie music".to_string()))
            .unwrap();

        let state = wait_for_idle_with_messages(&mut state_rx, 3).await;
        assert_eq!(state.messages[0].role, Role::User);
        assert!(state.messages.iter().any(|m| m.is_analysis));
        assert!(!state.entities.is_empty());
        assert!(!state.input_locked);
        // 过滤器跟随首个实体类型，可见列表非空
        assert_ne!(state.filter, Filter::All);
        assert!(!state.visible.is_empty());

        cmd_tx.send(Command::Clear).unwrap();
        let cleared = loop {
            {
                let state = state_rx.borrow();
                if state.messages.is_empty() {
                    break state.clone();
                }
            }
            timeout(Duration::from_secs(30), state_rx.changed())
                .await
                .expect("state update timed out")
                .expect("state channel closed");
        };
        assert!(cleared.entities.is_empty());
        assert_eq!(cleared.filter, Filter::All);

        cmd_tx.send(Command::Quit).unwrap();
    }
}
