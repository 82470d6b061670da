use std::net::SocketAddr;

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    root: std::path::PathBuf,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Use isolated temp dirs per test run
    let root = std::env::temp_dir().join(format!("e2e_{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&root).await?;
    tokio::fs::write(root.join("tokens.json"), br#"{"ed": "editor", "ro": "viewer"}"#).await?;

    let mut cfg = AppConfig::default();
    cfg.storage.data_dir = root.join("data");
    cfg.storage.tokens_file = root.join("tokens.json");
    let app = server::startup::build_app(&cfg).await?;

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, root })
}

#[tokio::test]
async fn e2e_public_ping() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/api/ping", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json")));
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body, json!({"ok": true}));
    let _ = tokio::fs::remove_dir_all(&app.root).await;
    Ok(())
}

#[tokio::test]
async fn e2e_editor_sync_cycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let doc = json!({"id": "s1", "version": "2", "updatedAt": "2024-05-01T10:00:00Z"});

    let res = c
        .put(format!("{}/api/scenarios/s1/2", app.base_url))
        .bearer_auth("ed")
        .json(&doc)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.get(format!("{}/api/scenarios", app.base_url)).bearer_auth("ro").send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let list = res.json::<serde_json::Value>().await?;
    assert_eq!(list, json!([{"id": "s1", "version": "2", "updatedAt": "2024-05-01T10:00:00Z", "name": "s1"}]));

    let res = c.get(format!("{}/api/scenarios/s1/2", app.base_url)).bearer_auth("ro").send().await?;
    assert_eq!(res.json::<serde_json::Value>().await?, doc);

    let res = c.delete(format!("{}/api/scenarios/s1/2", app.base_url)).bearer_auth("ro").send().await?;
    assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);
    assert_eq!(res.json::<serde_json::Value>().await?, json!({"message": "Editor role required"}));

    let res = c.delete(format!("{}/api/scenarios/s1/2", app.base_url)).bearer_auth("ed").send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.delete(format!("{}/api/scenarios/s1/2", app.base_url)).bearer_auth("ed").send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<serde_json::Value>().await?, json!({"message": "Scenario not found: s1 v2"}));

    let _ = tokio::fs::remove_dir_all(&app.root).await;
    Ok(())
}

#[tokio::test]
async fn e2e_protected_without_token_denied() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/api/profiles", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Authorization header required");
    let _ = tokio::fs::remove_dir_all(&app.root).await;
    Ok(())
}

#[tokio::test]
async fn e2e_concurrent_upserts_leave_valid_document() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let mut tasks = Vec::new();
    for i in 0..8 {
        let c = c.clone();
        let url = format!("{}/api/profiles/shared", app.base_url);
        tasks.push(tokio::spawn(async move {
            c.put(url).bearer_auth("ed").json(&json!({"id": "shared", "updatedAt": format!("t{i}")})).send().await
        }));
    }
    for t in tasks {
        assert_eq!(t.await??.status(), HttpStatusCode::OK);
    }
    let res = c.get(format!("{}/api/profiles/shared", app.base_url)).bearer_auth("ro").send().await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["id"], "shared");
    assert!(body["updatedAt"].as_str().is_some_and(|s| s.starts_with('t')));
    let _ = tokio::fs::remove_dir_all(&app.root).await;
    Ok(())
}
