//! HTTP API integration tests: status codes, route prefixes and tree shape,
//! driven against an in-process server on an ephemeral localhost port.

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use designboard::cli::FilesClient;
use designboard::server::{serve, AppState};
use designboard::storage::{FileKind, FilePatch, FileStore, SharedFileStore, MAX_DEPTH};

struct TestServer {
    base: String,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) { self.handle.abort(); }
}

// Bind first so the port is ready before the first request goes out.
async fn start_server(store: FileStore) -> TestServer {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.expect("bind 127.0.0.1:0");
    let port = listener.local_addr().unwrap().port();
    let state = AppState::new(SharedFileStore::new(store));
    let handle = tokio::spawn(async move {
        if let Err(e) = serve(listener, state).await {
            eprintln!("server task error: {e:?}");
        }
    });
    TestServer { base: format!("http://127.0.0.1:{}", port), handle }
}

fn ids(nodes: &Value) -> Vec<String> {
    nodes.as_array().unwrap().iter().map(|n| n["id"].as_str().unwrap().to_string()).collect()
}

#[tokio::test]
async fn liveness_and_health() -> Result<()> {
    let srv = start_server(FileStore::with_seed()).await;
    let http = reqwest::Client::new();

    let body = http.get(format!("{}/", srv.base)).send().await?.text().await?;
    assert_eq!(body, "designboard ok");

    let v: Value = http.get(format!("{}/health", srv.base)).send().await?.json().await?;
    assert_eq!(v["status"], "ok");
    assert_eq!(v["files"], 9);
    assert!(v["startedAt"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn listing_returns_seed_tree_without_root() -> Result<()> {
    let srv = start_server(FileStore::with_seed()).await;
    let http = reqwest::Client::new();

    for prefix in ["", "/api"] {
        let resp = http.get(format!("{}{}/files", srv.base, prefix)).send().await?;
        assert_eq!(resp.status(), StatusCode::OK);
        let tree: Value = resp.json().await?;
        assert_eq!(ids(&tree), vec![".git", "api", "docs", "frontend", "README.md"]);
        assert_eq!(ids(&tree[3]["children"]), vec!["index.js", "app.js", "styles.css"]);
        assert_eq!(tree[0]["children"], json!([]));
        assert!(tree[4].get("children").is_none());
        assert_eq!(tree[4]["content"], "# Project\n\nWelcome to your project!\n");
    }

    let flat: Value = http.get(format!("{}/files?flat=true", srv.base)).send().await?.json().await?;
    assert_eq!(flat.as_array().unwrap().len(), 9);
    assert_eq!(flat[0]["id"], "root");
    Ok(())
}

#[tokio::test]
async fn consecutive_listings_are_equal() -> Result<()> {
    let srv = start_server(FileStore::with_seed()).await;
    let http = reqwest::Client::new();
    let a: Value = http.get(format!("{}/api/files", srv.base)).send().await?.json().await?;
    let b: Value = http.get(format!("{}/api/files", srv.base)).send().await?.json().await?;
    assert_eq!(a, b);
    Ok(())
}

#[tokio::test]
async fn create_get_update_delete_flow() -> Result<()> {
    let srv = start_server(FileStore::new()).await;
    let http = reqwest::Client::new();

    let resp = http.post(format!("{}/api/files", srv.base))
        .json(&json!({"name": "src", "kind": "folder", "parentId": "root"}))
        .send().await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let folder: Value = resp.json().await?;
    let folder_id = folder["id"].as_str().unwrap().to_string();

    // `type` is accepted as an alias of `kind`
    let resp = http.post(format!("{}/files", srv.base))
        .json(&json!({"name": "main.rs", "type": "file", "parentId": folder_id, "content": "fn main() {}"}))
        .send().await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let file: Value = resp.json().await?;
    let file_id = file["id"].as_str().unwrap().to_string();
    assert_eq!(file["kind"], "file");
    assert_eq!(file["parentId"], folder_id.as_str());

    let got: Value = http.get(format!("{}/files/{}", srv.base, file_id)).send().await?.json().await?;
    assert_eq!(got, file);

    let resp = http.patch(format!("{}/api/files/{}", srv.base, file_id))
        .json(&json!({"content": "fn main() { println!(\"hi\"); }"}))
        .send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await?;
    assert_eq!(updated["name"], "main.rs");
    assert_eq!(updated["content"], "fn main() { println!(\"hi\"); }");

    let tree: Value = http.get(format!("{}/files", srv.base)).send().await?.json().await?;
    assert_eq!(ids(&tree), vec![folder_id.clone()]);
    assert_eq!(ids(&tree[0]["children"]), vec![file_id.clone()]);

    let resp = http.delete(format!("{}/api/files/{}", srv.base, folder_id)).send().await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    for id in [&folder_id, &file_id] {
        let resp = http.get(format!("{}/files/{}", srv.base, id)).send().await?;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
    let tree: Value = http.get(format!("{}/files", srv.base)).send().await?.json().await?;
    assert_eq!(tree, json!([]));
    Ok(())
}

#[tokio::test]
async fn error_statuses_and_bodies() -> Result<()> {
    let srv = start_server(FileStore::with_seed()).await;
    let http = reqwest::Client::new();

    // file as parent
    let resp = http.post(format!("{}/api/files", srv.base))
        .json(&json!({"name": "x", "kind": "file", "parentId": "README.md"}))
        .send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v: Value = resp.json().await?;
    assert_eq!(v["status"], "error");
    assert_eq!(v["code"], "invalid_parent");

    // missing parent
    let resp = http.post(format!("{}/api/files", srv.base))
        .json(&json!({"name": "x", "kind": "file", "parentId": "nowhere"}))
        .send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // empty name
    let resp = http.post(format!("{}/api/files", srv.base))
        .json(&json!({"name": "", "kind": "file", "parentId": null}))
        .send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v: Value = resp.json().await?;
    assert_eq!(v["code"], "validation_error");

    // malformed body
    let resp = http.post(format!("{}/api/files", srv.base))
        .json(&json!({"name": "x", "kind": "symlink"}))
        .send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v: Value = resp.json().await?;
    assert_eq!(v["code"], "invalid_body");

    // unknown ids
    let resp = http.get(format!("{}/api/files/ghost", srv.base)).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = http.patch(format!("{}/api/files/ghost", srv.base)).json(&json!({"name": "y"})).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = http.delete(format!("{}/api/files/ghost", srv.base)).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // root is protected
    let resp = http.delete(format!("{}/api/files/root", srv.base)).send().await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let v: Value = resp.json().await?;
    assert_eq!(v["code"], "protected_record");

    // nothing above changed the store
    let flat: Value = http.get(format!("{}/files?flat=true", srv.base)).send().await?.json().await?;
    assert_eq!(flat.as_array().unwrap().len(), 9);
    Ok(())
}

#[tokio::test]
async fn files_client_round_trip() -> Result<()> {
    let srv = start_server(FileStore::with_seed()).await;
    let client = FilesClient::new(&srv.base)?;

    let dir = client.create("assets", FileKind::Folder, Some("frontend"), None).await?;
    let logo = client.create("logo.svg", FileKind::File, Some(dir.id.as_str()), Some("<svg/>")).await?;
    assert_eq!(client.get(&logo.id).await?, logo);

    let renamed = client.update(&logo.id, &FilePatch { name: Some("icon.svg".into()), content: None }).await?;
    assert_eq!(renamed.name, "icon.svg");
    assert_eq!(renamed.content.as_deref(), Some("<svg/>"));

    let tree = client.tree().await?;
    let frontend = tree.iter().find(|n| n.id() == "frontend").unwrap();
    let assets = frontend.children().iter().find(|n| n.id() == dir.id).unwrap();
    assert_eq!(assets.children()[0].record.name, "icon.svg");

    assert!(client.delete(&dir.id).await?);
    assert!(!client.delete(&dir.id).await?);
    assert_eq!(client.list().await?.len(), 9);

    let err = client.delete("root").await.unwrap_err();
    assert!(err.to_string().contains("protected_record"));
    let err = client.get("ghost").await.unwrap_err();
    assert!(err.to_string().contains("404"));
    Ok(())
}

#[tokio::test]
async fn max_depth_chain_is_served_and_decoded() -> Result<()> {
    let srv = start_server(FileStore::new()).await;
    let client = FilesClient::new(&srv.base)?;

    let mut parent: Option<String> = None;
    for i in 0..MAX_DEPTH {
        let dir = client.create(&format!("d{i}"), FileKind::Folder, parent.as_deref(), None).await?;
        parent = Some(dir.id);
    }

    let http = reqwest::Client::new();
    let resp = http.post(format!("{}/api/files", srv.base))
        .json(&json!({"name": "too-deep", "kind": "folder", "parentId": parent}))
        .send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v: Value = resp.json().await?;
    assert_eq!(v["code"], "validation_error");

    let tree = client.tree().await?;
    assert_eq!(tree.len(), 1);
    let mut depth = 1;
    let mut cur = &tree[0];
    while let Some(next) = cur.children().first() {
        depth += 1;
        cur = next;
    }
    assert_eq!(depth, MAX_DEPTH);
    assert_eq!(Some(cur.id()), parent.as_deref());
    Ok(())
}

#[tokio::test]
async fn empty_parent_id_creates_top_level_record() -> Result<()> {
    let srv = start_server(FileStore::new()).await;
    let http = reqwest::Client::new();
    let resp = http.post(format!("{}/api/files", srv.base))
        .json(&json!({"name": "notes.txt", "kind": "file", "parentId": ""}))
        .send().await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let rec: Value = resp.json().await?;
    assert_eq!(rec["parentId"], Value::Null);
    let tree: Value = http.get(format!("{}/files", srv.base)).send().await?.json().await?;
    assert_eq!(ids(&tree), vec![rec["id"].as_str().unwrap().to_string()]);
    Ok(())
}
