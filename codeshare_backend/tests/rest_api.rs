use codeshare_backend::config::{CodeshareConfig, CodesharePaths, GithubConfig};
use codeshare_backend::database::repositories::PostRepository;
use codeshare_backend::database::Database;
use codeshare_backend::node::CodeshareNode;
use codeshare_backend::posts::CreatePostInput;
use codeshare_backend::{api, posts::PAGE_SIZE};
use tempfile::{tempdir, TempDir};
use tokio::time::{sleep, Duration};

struct TestServer {
    _dir: TempDir,
    database: Database,
    server: tokio::task::JoinHandle<()>,
    base_url: String,
}

impl TestServer {
    async fn shutdown(self) {
        self.server.abort();
        let _ = self.server.await;
    }

    fn post_count(&self) -> i64 {
        self.database
            .with_repositories(|repos| repos.posts().count())
            .expect("count posts")
    }
}

fn next_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind ephemeral port")
        .local_addr()
        .unwrap()
        .port()
}

async fn wait_for_health(base_url: &str) {
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        sleep(Duration::from_millis(100)).await;
    }
    panic!("server did not become healthy in time");
}

async fn spawn_server() -> TestServer {
    let dir = tempdir().expect("tempdir");
    let port = next_port();
    let config = CodeshareConfig::new(
        port,
        CodesharePaths::from_base_dir(dir.path()).expect("paths"),
        GithubConfig::default(),
    );

    let node = CodeshareNode::start(config.clone()).expect("node start");
    let snapshot = node.snapshot();
    let database = snapshot.database.clone();

    let server = tokio::spawn(async move {
        let _ = api::serve_http(snapshot.config, snapshot.database).await;
    });

    let base_url = format!("http://127.0.0.1:{port}");
    wait_for_health(&base_url).await;

    TestServer {
        _dir: dir,
        database,
        server,
        base_url,
    }
}

fn valid_input(title: &str) -> CreatePostInput {
    CreatePostInput {
        username: "ada".into(),
        title: title.into(),
        description: "A responsive nav bar example".into(),
        technologies: vec!["HTML5".into()],
        screenshots: vec!["https://x/1.png".into()],
        ..Default::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn create_then_fetch_round_trip() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let create_resp = client
        .post(format!("{}/posts", server.base_url))
        .json(&valid_input("Nav Bar"))
        .send()
        .await
        .expect("create response");
    assert_eq!(create_resp.status(), 200);
    let ack: serde_json::Value = create_resp.json().await.expect("create json");
    assert_eq!(ack.get("success").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(server.post_count(), 1);

    let feed: serde_json::Value = client
        .get(format!("{}/posts", server.base_url))
        .send()
        .await
        .expect("feed response")
        .json()
        .await
        .expect("feed json");
    let posts = feed.get("posts").and_then(|p| p.as_array()).expect("posts");
    assert_eq!(posts.len(), 1);
    assert!(feed.get("nextCursor").unwrap().is_null());

    let id = posts[0].get("id").and_then(|v| v.as_i64()).expect("post id");
    let single: serde_json::Value = client
        .get(format!("{}/posts/{id}", server.base_url))
        .send()
        .await
        .expect("single response")
        .json()
        .await
        .expect("single json");
    let post = single.get("post").expect("post wrapper");
    assert_eq!(post.get("title").and_then(|v| v.as_str()), Some("Nav Bar"));
    assert_eq!(post.get("username").and_then(|v| v.as_str()), Some("ada"));
    assert_eq!(
        post.get("screenshots").and_then(|v| v.as_array()).map(Vec::len),
        Some(1)
    );

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn invalid_submission_is_rejected_without_a_write() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let mut input = valid_input("Nav Bar");
    input.screenshots.clear();

    let resp = client
        .post(format!("{}/posts", server.base_url))
        .json(&input)
        .send()
        .await
        .expect("create response");
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.expect("error json");
    let errors = body.get("errors").and_then(|e| e.as_array()).expect("errors");
    assert!(errors.iter().any(|e| {
        e.get("field").and_then(|f| f.as_str()) == Some("screenshots")
            && e.get("message")
                .and_then(|m| m.as_str())
                .is_some_and(|m| m.contains("image"))
    }));
    assert_eq!(server.post_count(), 0);

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cursor_pagination_visits_every_post_once() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    for i in 0..45 {
        let resp = client
            .post(format!("{}/posts", server.base_url))
            .json(&valid_input(&format!("post {i}")))
            .send()
            .await
            .expect("create response");
        assert_eq!(resp.status(), 200);
    }

    // First page is requested with the empty-string cursor, as the web
    // client does.
    let mut cursor = String::new();
    let mut seen: Vec<i64> = Vec::new();
    loop {
        let page: serde_json::Value = client
            .get(format!("{}/posts?cursor={cursor}", server.base_url))
            .send()
            .await
            .expect("page response")
            .json()
            .await
            .expect("page json");
        let posts = page.get("posts").and_then(|p| p.as_array()).expect("posts");
        assert!(posts.len() <= PAGE_SIZE);
        let ids: Vec<i64> = posts
            .iter()
            .map(|p| p.get("id").and_then(|v| v.as_i64()).expect("id"))
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        if let Ok(prev) = cursor.parse::<i64>() {
            assert!(ids.iter().all(|id| *id > prev));
        }
        seen.extend(ids);

        match page.get("nextCursor").and_then(|c| c.as_i64()) {
            Some(next) => cursor = next.to_string(),
            None => break,
        }
    }

    assert_eq!(seen.len(), 45);
    let mut deduped = seen.clone();
    deduped.dedup();
    assert_eq!(deduped, seen);

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn error_statuses_are_distinct() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/posts/9999", server.base_url))
        .send()
        .await
        .expect("missing post response");
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(
        body.get("message").and_then(|m| m.as_str()),
        Some("Post not found.")
    );

    let resp = client
        .get(format!("{}/posts/not-a-number", server.base_url))
        .send()
        .await
        .expect("bad id response");
    assert_eq!(resp.status(), 400);

    let resp = client
        .get(format!("{}/posts?cursor=garbage", server.base_url))
        .send()
        .await
        .expect("bad cursor response");
    assert_eq!(resp.status(), 400);

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn proxy_guards_reject_bad_urls_without_upstream_calls() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/repo-tree", server.base_url))
        .send()
        .await
        .expect("missing url response");
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(
        body.get("message").and_then(|m| m.as_str()),
        Some("Missing URL parameter")
    );

    let resp = client
        .get(format!(
            "{}/repo-tree?url=https://example.com/owner",
            server.base_url
        ))
        .send()
        .await
        .expect("bad repo url response");
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(
        body.get("message").and_then(|m| m.as_str()),
        Some("Invalid GitHub URL")
    );

    let resp = client
        .get(format!("{}/repo-folder", server.base_url))
        .send()
        .await
        .expect("missing folder url response");
    assert_eq!(resp.status(), 400);

    let resp = client
        .get(format!(
            "{}/repo-folder?url=https://evil.example/contents",
            server.base_url
        ))
        .send()
        .await
        .expect("non-github folder url response");
    assert_eq!(resp.status(), 400);

    server.shutdown().await;
}
