//! End-to-end persistence: a checker's store survives a simulated process
//! restart through its snapshot, and the id counter resumes past the
//! restored batches.

use linkcheckd::{BatchId, BatchStore, Config, LinkChecker, LinkStatus};
use std::sync::Arc;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn snapshot_survives_restart_and_resumes_ids() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("storage.json");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.store.snapshot_path = snapshot.clone();
    let config = Arc::new(config);

    // First process lifetime: submit a batch and shut down cleanly
    {
        let store = Arc::new(BatchStore::new(config.store.ttl()));
        let checker = LinkChecker::new(store, config.clone()).unwrap();

        let (id, links) = checker
            .submit(vec![server.uri(), "not a url".to_string()])
            .await
            .unwrap();
        assert_eq!(id, BatchId(1));
        assert_eq!(links[0].status, LinkStatus::Available);
        assert_eq!(links[1].status, LinkStatus::Unavailable);

        checker.shutdown().unwrap();
    }
    assert!(snapshot.exists());

    // Second process lifetime: restore and keep going
    let store = Arc::new(BatchStore::new(config.store.ttl()));
    store.load(&snapshot).unwrap();
    let checker = LinkChecker::new(store, config.clone()).unwrap();

    let restored = checker.retrieve(BatchId(1)).await.unwrap();
    assert_eq!(restored.len(), 2);
    assert_eq!(restored[0].url, server.uri());

    // No collision with restored ids
    let (id, _) = checker.submit(vec![server.uri()]).await.unwrap();
    assert_eq!(id, BatchId(2));
}

#[tokio::test]
async fn restart_without_snapshot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();

    let config = Arc::new(Config::default());
    let store = Arc::new(BatchStore::new(config.store.ttl()));
    store.load(dir.path().join("never-written.json")).unwrap();

    let checker = LinkChecker::new(store, config).unwrap();
    assert!(checker.retrieve(BatchId(1)).await.is_none());
}
