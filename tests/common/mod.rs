#![allow(dead_code)]

use axum::{
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// Base URL of an in-process mock of the statistics API.
///
/// It runs on its own thread and runtime so it outlives individual tests.
pub static UPSTREAM: Lazy<String> = Lazy::new(start_upstream);

pub const LATEST_DATE: &str = "2024-01-02";
pub const PREVIOUS_DATE: &str = "2024-01-01";
/// The backend serializes datetimes in HTTP date form.
pub const CHAMPION_CREATED: &str = "Tue, 02 Jan 2024 08:30:00 GMT";

#[derive(Clone, Copy)]
enum Failure {
    None,
    Batch,
    Trends,
}

/// Every endpoint answers with the fixtures below.
pub fn healthy_api() -> String {
    format!("{}/ok", *UPSTREAM)
}

/// The batch comments endpoint answers 500; the rest succeed.
pub fn broken_batch_api() -> String {
    format!("{}/broken", *UPSTREAM)
}

/// Only the weekly trends endpoint fails.
pub fn broken_trends_api() -> String {
    format!("{}/no-trends", *UPSTREAM)
}

fn start_upstream() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock upstream");
    let addr = listener.local_addr().expect("mock upstream address");
    listener
        .set_nonblocking(true)
        .expect("nonblocking mock listener");

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("mock upstream runtime");
        runtime.block_on(async move {
            let listener =
                tokio::net::TcpListener::from_std(listener).expect("tokio mock listener");
            let app = Router::new()
                .nest("/ok", api(Failure::None))
                .nest("/broken", api(Failure::Batch))
                .nest("/no-trends", api(Failure::Trends));
            axum::serve(listener, app).await.expect("mock upstream");
        });
    });

    format!("http://{addr}")
}

fn api(failure: Failure) -> Router {
    let batch = match failure {
        Failure::Batch => get(|| async { server_error() }),
        _ => get(|| async { (StatusCode::OK, Json(batch_fixture())) }),
    };
    let trends = match failure {
        Failure::Trends => get(|| async { server_error() }),
        _ => get(|| async { (StatusCode::OK, Json(trends_fixture())) }),
    };

    Router::new()
        .route("/api/all-time-champion", get(champion))
        .route(
            "/api/all-time-subreddit-totals",
            get(|| async { Json(all_time_totals_fixture()) }),
        )
        .route("/api/subreddit-totals", get(|| async { Json(day_totals_fixture()) }))
        .route("/api/comments/batch", batch)
        .route("/api/weekly-trends", trends)
}

fn server_error() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "database unavailable" })),
    )
}

async fn champion(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    let cacheable = headers
        .get("cache-control")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("max-age"));
    if !cacheable {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut champion = comment("champ", "worldnews", -5000);
    champion["created_utc"] = json!(CHAMPION_CREATED);
    Ok(Json(json!({ "champion": champion })))
}

fn comment(id: &str, subreddit: &str, score: i64) -> Value {
    json!({
        "comment_id": id,
        "score": score,
        "author": format!("user_{id}"),
        "subreddit": subreddit,
        "body": format!("comment {id}"),
        "created_utc": "2024-01-02T06:15:00",
        "permalink": format!("https://reddit.com/r/{subreddit}/comments/{id}"),
        "submission_title": "thread",
        "recorded_date": LATEST_DATE
    })
}

/// One comment per subreddit. Bucket worst scores: Entertainment -300,
/// Cities -45, News -800, Hobbies -33, Sports -210. `rust` is unmapped.
pub fn batch_fixture() -> Value {
    json!({
        "comments": {
            "movies": comment("movies1", "movies", -120),
            "rust": comment("rust1", "rust", -9999),
            "gaming": comment("gaming1", "gaming", -300),
            "seattle": comment("seattle1", "seattle", -45),
            "news": comment("news1", "news", -80),
            "politics": comment("politics1", "politics", -800),
            "science": comment("science1", "science", -15),
            "golf": comment("golf1", "golf", -33),
            "nba": comment("nba1", "nba", -210),
            "nfl": comment("nfl1", "nfl", -99)
        }
    })
}

pub fn all_time_totals_fixture() -> Value {
    json!({
        "totals": [
            { "subreddit": "politics", "all_time_downvotes": -90000 },
            { "subreddit": "news", "all_time_downvotes": -70000 },
            { "subreddit": "nba", "all_time_downvotes": -50000 },
            { "subreddit": "gaming", "all_time_downvotes": -30000 },
            { "subreddit": "seattle", "all_time_downvotes": -20000 },
            { "subreddit": "golf", "all_time_downvotes": -100 }
        ]
    })
}

pub fn day_totals_fixture() -> Value {
    json!({
        "totals": [
            { "subreddit": "politics", "total_downvotes": -1200, "total_comments": 30, "recorded_date": LATEST_DATE },
            { "subreddit": "nba", "total_downvotes": -400, "total_comments": 8, "recorded_date": LATEST_DATE },
            { "subreddit": "golf", "total_downvotes": -12, "total_comments": 2, "recorded_date": PREVIOUS_DATE }
        ]
    })
}

pub fn trends_fixture() -> Value {
    json!({
        "trends": {
            "seattle": [
                { "date": LATEST_DATE, "downvotes": -60, "comments": 5 },
                { "date": PREVIOUS_DATE, "downvotes": -35, "comments": 3 }
            ],
            "nba": [
                { "date": LATEST_DATE, "downvotes": -400, "comments": 8 }
            ]
        }
    })
}
