//! Startup integration tests
//!
//! `sibyl::run` installs the global subscriber, so this binary holds a
//! single test.

use sibyl::config::SibylConfig;
use sibyl::SibylError;

#[tokio::test]
async fn test_run_fails_fast_without_model() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = SibylConfig::default();
    config.model.path = dir.path().join("user_behavior_model.bin");
    config.server.bind_addr = "127.0.0.1:0".parse().unwrap();

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), sibyl::run(config))
        .await
        .expect("startup must not hang when the model is missing");

    assert!(matches!(result, Err(SibylError::ModelNotFound(_))));
}
