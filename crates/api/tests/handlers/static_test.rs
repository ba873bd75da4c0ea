use std::sync::Arc;

use parkspot_api::config::ApiConfig;
use parkspot_core::store::memory::{MemoryIdentityStore, MemorySlotStore};
use pretty_assertions::assert_eq;

use crate::test_utils::TestContext;

const INDEX: &str = "<html>app</html>";

fn spa_context(dir: &tempfile::TempDir) -> TestContext {
    std::fs::write(dir.path().join("index.html"), INDEX).expect("Failed to write index.html");
    std::fs::write(dir.path().join("app.js"), "console.log('app');")
        .expect("Failed to write app.js");

    let config = ApiConfig {
        static_dir: Some(dir.path().to_path_buf()),
        ..ApiConfig::default()
    };
    TestContext::with_config(
        Arc::new(MemorySlotStore::new()),
        Arc::new(MemoryIdentityStore::new()),
        chrono::Duration::hours(24),
        &config,
    )
}

#[tokio::test]
async fn test_client_routes_serve_index() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let ctx = spa_context(&dir);

    let response = ctx.server.get("/slots/dashboard").await;
    response.assert_status_ok();
    assert_eq!(response.text(), INDEX);

    let response = ctx.server.get("/").await;
    response.assert_status_ok();
    assert_eq!(response.text(), INDEX);
}

#[tokio::test]
async fn test_static_assets_and_api_still_resolve() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let ctx = spa_context(&dir);

    let response = ctx.server.get("/app.js").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "console.log('app');");

    let response = ctx.server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "status": "ok" }));
}
