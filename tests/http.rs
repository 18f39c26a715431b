mod common;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct DashboardStatus {
    status: String,
    error: Option<String>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(unix)]
mod cleanup {
    use std::sync::Mutex;
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PIDS: Mutex<Vec<i32>> = Mutex::new(Vec::new());

    pub fn register(pid: u32) {
        if let Ok(mut pids) = PIDS.lock() {
            pids.push(pid as i32);
        }
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for pid in pids.iter().copied().filter(|pid| *pid > 0) {
                unsafe {
                    libc::kill(pid, libc::SIGTERM);
                }
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/healthz")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

/// Polls the JSON mirror until the first load cycle has settled.
async fn wait_for_load(server: &TestServer) -> DashboardStatus {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let status: DashboardStatus = client
            .get(format!("{}/api/dashboard", server.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if status.status != "loading" && status.status != "idle" {
            return status;
        }
        if Instant::now() > deadline {
            panic!("dashboard load did not settle");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(api_url: String) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_downvote_dashboard"))
        .env("PORT", port.to_string())
        .env("DOWNVOTE_API_URL", api_url)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn get_html(server: &TestServer, path: &str) -> String {
    let response = Client::new()
        .get(format!("{}{path}", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.text().await.unwrap()
}

#[tokio::test]
async fn http_category_tab_shows_worst_comment_per_category() {
    let server = spawn_server(common::healthy_api()).await;
    let status = wait_for_load(&server).await;
    assert_eq!(status.status, "ready");

    let html = get_html(&server, "/").await;
    assert_eq!(html.matches(r#"class="card category-card""#).count(), 5);
    assert!(html.contains("Most Downvoted Comment Discovered"));
    assert!(html.contains("January 2, 2024"));
    assert!(!html.contains(common::CHAMPION_CREATED));

    let expected = [
        ("Entertainment", 2, "gaming1"),
        ("Cities", 1, "seattle1"),
        ("News", 3, "politics1"),
        ("Hobbies", 1, "golf1"),
        ("Sports", 2, "nba1"),
    ];
    for (category, count, worst) in expected {
        let marker = format!(r#"data-category="{category}" data-count="{count}""#);
        let start = html.find(&marker).unwrap_or_else(|| panic!("missing card {category}"));
        let card = &html[start..];
        let card = &card[..card.find("</article>").unwrap()];
        assert!(card.contains(&format!("comment {worst}")), "{category} card");
    }
    assert!(!html.contains("comment rust1"));

    let news = html.find(r#"data-category="News""#).unwrap();
    let hobbies = html.find(r#"data-category="Hobbies""#).unwrap();
    assert!(news < hobbies);
}

#[tokio::test]
async fn http_category_modal_lists_full_bucket() {
    let server = spawn_server(common::healthy_api()).await;
    wait_for_load(&server).await;

    let html = get_html(&server, "/?view=categories&category=News").await;
    assert!(html.contains("News - Most Downvoted Today"));
    let modal = &html[html.find(r#"class="modal-content""#).unwrap()..];
    let politics = modal.find(r#"data-comment-id="politics1""#).unwrap();
    let news = modal.find(r#"data-comment-id="news1""#).unwrap();
    let science = modal.find(r#"data-comment-id="science1""#).unwrap();
    assert!(politics < news && news < science);
}

#[tokio::test]
async fn http_subreddit_tab_shows_latest_day_only() {
    let server = spawn_server(common::healthy_api()).await;
    wait_for_load(&server).await;

    let html = get_html(&server, "/?view=subreddits").await;
    assert_eq!(html.matches(r#"class="card subreddit-card""#).count(), 2);
    assert_eq!(
        html.matches(&format!(r#"data-date="{}""#, common::LATEST_DATE)).count(),
        2
    );
    assert!(!html.contains(&format!(r#"data-date="{}""#, common::PREVIOUS_DATE)));
    assert_eq!(html.matches(r#"class="leader-row""#).count(), 5);
    assert!(!html.contains(r#"class="card category-card""#));
}

#[tokio::test]
async fn http_trends_load_lazily() {
    let server = spawn_server(common::healthy_api()).await;
    wait_for_load(&server).await;

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let html = get_html(&server, "/?view=trends&trend_category=Cities").await;
        if html.contains(r#"class="card trend-card""#) {
            assert_eq!(html.matches(r#"class="card trend-card""#).count(), 5);
            assert!(html.contains("r/seattle"));
            assert!(html.contains("No data yet"));
            break;
        }
        if Instant::now() > deadline {
            panic!("trends never loaded");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

#[tokio::test]
async fn http_trends_failure_leaves_dashboard_intact() {
    let server = spawn_server(common::broken_trends_api()).await;
    assert_eq!(wait_for_load(&server).await.status, "ready");

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let html = get_html(&server, "/?view=trends").await;
        if html.contains("Error loading trends") {
            break;
        }
        if Instant::now() > deadline {
            panic!("trend error never shown");
        }
        sleep(Duration::from_millis(100)).await;
    }

    let html = get_html(&server, "/?view=categories").await;
    assert_eq!(html.matches(r#"class="card category-card""#).count(), 5);
}

#[tokio::test]
async fn http_failed_load_shows_fixed_message() {
    let server = spawn_server(common::broken_batch_api()).await;
    let status = wait_for_load(&server).await;
    assert_eq!(status.status, "error");
    assert_eq!(
        status.error.as_deref(),
        Some("Failed to fetch data. Please try again later.")
    );

    let html = get_html(&server, "/").await;
    assert!(html.contains("Failed to fetch data. Please try again later."));
    assert!(!html.contains(r#"class="card category-card""#));
    assert!(!html.contains("database unavailable"));

    let response = Client::new()
        .post(format!("{}/reload", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(wait_for_load(&server).await.status, "error");
}

#[tokio::test]
async fn http_rejects_unknown_view() {
    let server = spawn_server(common::healthy_api()).await;
    let response = Client::new()
        .get(format!("{}/?view=charts", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
