use crate::chart::render_line_chart;
use crate::controller::{ActiveView, TrendsState};
use crate::models::{AllTimeSubredditTotal, CategoryBucket, Comment, DashboardData, SubredditTotal};
use crate::taxonomy::Taxonomy;
use crate::trends::series_for_category;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const LEADERBOARD_SIZE: usize = 5;

/// Everything the dashboard page needs for one render.
pub struct DashboardView<'a> {
    pub data: &'a DashboardData,
    pub taxonomy: &'a Taxonomy<'a>,
    pub active_view: ActiveView,
    pub open_category: Option<&'a str>,
    pub trends: &'a TrendsState,
    pub trend_category: &'a str,
}

pub fn render_loading() -> String {
    page(
        r#"<meta http-equiv="refresh" content="2" />"#,
        r#"<div class="status-screen"><h1>Loading comments...</h1></div>"#,
    )
}

pub fn render_error(message: &str) -> String {
    let body = format!(
        r#"<div class="status-screen">
      <h1 class="error">{}</h1>
      <form method="post" action="/reload"><button class="btn" type="submit">Try again</button></form>
    </div>"#,
        escape_html(message)
    );
    page("", &body)
}

pub fn render_dashboard(view: &DashboardView<'_>) -> String {
    let mut body = String::new();
    body.push_str(r#"<main class="app"><h1>Reddit Downvote Analyzer</h1>"#);
    body.push_str(&render_tabs(view.active_view));

    match view.active_view {
        ActiveView::Categories => {
            if let Some(champion) = &view.data.champion {
                body.push_str(&render_champion_card(champion));
            }
        }
        ActiveView::Subreddits => body.push_str(&render_leaderboard(&view.data.all_time_totals)),
        ActiveView::Trends => {}
    }

    let (title, description) = header_content(view.active_view);
    body.push_str(&format!(
        r#"<header class="section-header"><h2>{title}</h2><p class="subtitle">{description}</p></header>"#
    ));

    match view.active_view {
        ActiveView::Categories => {
            body.push_str(&render_category_section(&view.data.categorized.buckets));
            if let Some(bucket) = view
                .open_category
                .and_then(|name| view.data.categorized.get(name))
            {
                body.push_str(&render_category_modal(bucket));
            }
        }
        ActiveView::Subreddits => body.push_str(&render_subreddit_totals(&view.data.subreddit_totals)),
        ActiveView::Trends => body.push_str(&render_trends(view)),
    }

    body.push_str("</main>");

    let head = if matches!(view.trends, TrendsState::Loading) && view.active_view == ActiveView::Trends {
        r#"<meta http-equiv="refresh" content="2" />"#
    } else {
        ""
    };
    page(head, &body)
}

fn header_content(view: ActiveView) -> (&'static str, &'static str) {
    match view {
        ActiveView::Categories => (
            "Daily Downvotes by Category",
            "Check out the most downvoted comments in the last 24 hours in the most popular subreddits.",
        ),
        ActiveView::Trends => (
            "Downvote Patterns by Subreddit",
            "Track how comment downvotes evolve over time for each subreddit in the past 7 days.",
        ),
        ActiveView::Subreddits => (
            "Daily Downvotes by Subreddit",
            "See which subreddits have accumulated the most comment downvotes in the past 24 hours.",
        ),
    }
}

fn render_tabs(active: ActiveView) -> String {
    let mut html = String::from(r#"<nav class="tabs" role="tablist">"#);
    for view in ActiveView::ALL {
        let class = if view == active { "tab active" } else { "tab" };
        html.push_str(&format!(
            r#"<a class="{class}" role="tab" aria-selected="{}" href="/?view={}">{}</a>"#,
            view == active,
            view.key(),
            view.tab_label()
        ));
    }
    html.push_str("</nav>");
    html
}

fn render_champion_card(champion: &Comment) -> String {
    format!(
        r#"<section class="card champion-card">
      <h2>Most Downvoted Comment Discovered</h2>
      <div class="accent-bar"></div>
      <div class="champion-body">
        <span class="score">{score}</span>
        <div>
          <p class="meta">Posted by <strong>u/{author}</strong> in {subreddit}</p>
          <p class="comment-body">{body}</p>
        </div>
      </div>
      <footer class="card-footer"><span class="meta">{date}</span>{link}</footer>
    </section>"#,
        score = champion.score,
        author = escape_html(&champion.author),
        subreddit = subreddit_link(&champion.subreddit),
        body = escape_html(&champion.body),
        date = format_date(champion.created_utc.as_deref(), DateStyle::Long),
        link = permalink(&champion.permalink),
    )
}

fn render_category_section(buckets: &[CategoryBucket]) -> String {
    let mut ordered: Vec<&CategoryBucket> = buckets.iter().collect();
    ordered.sort_by_key(|bucket| bucket.worst().map_or(0, |comment| comment.score));

    let mut html = String::from(r#"<section class="grid categories">"#);
    for bucket in ordered {
        html.push_str(&render_category_card(bucket));
    }
    html.push_str("</section>");
    html
}

fn render_category_card(bucket: &CategoryBucket) -> String {
    let (score, body, source) = match bucket.worst() {
        Some(worst) => (
            worst.score,
            escape_html(&worst.body),
            format!("Worst Today: r/{}", escape_html(&worst.subreddit)),
        ),
        None => (0, "No comments yet".to_string(), "No comments today".to_string()),
    };
    let count = bucket.comments.len();
    let noun = if count == 1 { "comment" } else { "comments" };
    let category = escape_html(&bucket.category);

    format!(
        r#"<article class="card category-card" data-category="{category}" data-count="{count}">
      <h3>{category}</h3>
      <div class="category-body">
        <span class="score">{score}</span>
        <div>
          <p class="comment-body clamp">{body}</p>
          <span class="meta">{source}</span>
          <span class="meta count">{count} downvoted {noun} today</span>
        </div>
      </div>
      <footer class="card-footer"><a class="link" href="/?view=categories&amp;category={category}">View More Downvoted Comments &rarr;</a></footer>
    </article>"#
    )
}

fn render_category_modal(bucket: &CategoryBucket) -> String {
    let mut html = format!(
        r#"<div class="modal-backdrop"><div class="modal" role="dialog" aria-modal="true">
      <header class="modal-header"><h2>{} - Most Downvoted Today</h2><a class="close" href="/?view=categories" aria-label="Close">&times;</a></header>
      <div class="modal-content">"#,
        escape_html(&bucket.category)
    );
    if bucket.comments.is_empty() {
        html.push_str(r#"<p class="empty">No comments yet</p>"#);
    }
    for (index, comment) in bucket.comments.iter().enumerate() {
        html.push_str(&render_comment_card(comment, index == 0));
    }
    html.push_str("</div></div></div>");
    html
}

fn render_comment_card(comment: &Comment, is_first: bool) -> String {
    let class = if is_first { "comment-card first" } else { "comment-card" };
    format!(
        r#"<article class="{class}" data-comment-id="{id}">
        <span class="score">{score}</span>
        <div>
          <p class="meta">Posted by <strong>u/{author}</strong> in {subreddit}</p>
          <p class="comment-body">{body}</p>
          <footer class="card-footer"><span class="meta">{date}</span>{link}</footer>
        </div>
      </article>"#,
        id = escape_html(&comment.comment_id),
        score = comment.score,
        author = escape_html(&comment.author),
        subreddit = subreddit_link(&comment.subreddit),
        body = escape_html(&comment.body),
        date = format_date(comment.created_utc.as_deref(), DateStyle::Short),
        link = permalink(&comment.permalink),
    )
}

fn render_leaderboard(totals: &[AllTimeSubredditTotal]) -> String {
    let mut html = String::from(
        r#"<section class="card leaderboard"><h2>Comment Downvotes by Subreddit Leaderboard</h2><div class="accent-bar"></div>"#,
    );
    if totals.is_empty() {
        html.push_str(r#"<p class="empty">No subreddit data available.</p>"#);
    }
    html.push_str("<ol>");
    for (index, total) in totals.iter().take(LEADERBOARD_SIZE).enumerate() {
        html.push_str(&format!(
            r#"<li class="leader-row"><span class="rank">#{}</span>{}<span class="score">{}</span></li>"#,
            index + 1,
            subreddit_link(&total.subreddit),
            total.all_time_downvotes
        ));
    }
    html.push_str("</ol></section>");
    html
}

fn render_subreddit_totals(totals: &[SubredditTotal]) -> String {
    let mut html = String::from(r#"<section class="grid subreddits">"#);
    for total in totals {
        let average = total
            .average_downvotes()
            .map(|average| format!("{average} downvotes per downvoted comment"))
            .unwrap_or_default();
        html.push_str(&format!(
            r#"<article class="card subreddit-card" data-date="{date}">
        <span class="score">{downvotes}</span>
        {link}
        <span class="meta">{comments} downvoted comments</span>
        <span class="meta average">{average}</span>
      </article>"#,
            date = escape_html(&total.recorded_date),
            downvotes = total.total_downvotes,
            link = subreddit_link(&total.subreddit),
            comments = total.total_comments,
        ));
    }
    html.push_str("</section>");
    html
}

fn render_trends(view: &DashboardView<'_>) -> String {
    let mut html = String::from(
        r#"<section class="trends"><form class="trend-picker" method="get" action="/"><input type="hidden" name="view" value="trends" /><select name="trend_category">"#,
    );
    for name in view.taxonomy.category_names() {
        let selected = if name == view.trend_category { " selected" } else { "" };
        html.push_str(&format!(r#"<option value="{0}"{selected}>{0}</option>"#, escape_html(name)));
    }
    html.push_str(r#"</select><button class="btn" type="submit">Show</button></form>"#);

    match view.trends {
        TrendsState::NotRequested | TrendsState::Loading => {
            html.push_str(r#"<p class="status">Loading trends...</p>"#);
        }
        TrendsState::Error(message) => {
            html.push_str(&format!(
                r#"<p class="status error">Error loading trends: {}</p>"#,
                escape_html(message)
            ));
        }
        TrendsState::Ready(trends) => {
            for series in series_for_category(view.taxonomy, trends, view.trend_category) {
                html.push_str(&format!(
                    r#"<article class="card trend-card"><h3>{}</h3>{}</article>"#,
                    subreddit_link(&series.subreddit),
                    render_line_chart(&series.points)
                ));
            }
        }
    }

    html.push_str("</section>");
    html
}

fn subreddit_link(subreddit: &str) -> String {
    let name = escape_html(subreddit);
    format!(
        r#"<a class="link" href="https://reddit.com/r/{name}" target="_blank" rel="noopener noreferrer">r/{name}</a>"#
    )
}

fn permalink(url: &str) -> String {
    format!(
        r#"<a class="link" href="{}" target="_blank" rel="noopener noreferrer">View on Reddit &rarr;</a>"#,
        escape_html(url)
    )
}

#[derive(Clone, Copy)]
enum DateStyle {
    Long,
    Short,
}

fn format_date(raw: Option<&str>, style: DateStyle) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| DateTime::parse_from_rfc2822(raw).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match (date, style) {
        (Ok(date), DateStyle::Long) => date.format("%B %-d, %Y").to_string(),
        (Ok(date), DateStyle::Short) => date.format("%-m/%-d/%Y").to_string(),
        (Err(_), _) => escape_html(raw),
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn page(head: &str, body: &str) -> String {
    PAGE_HTML.replace("{{HEAD}}", head).replace("{{BODY}}", body)
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Reddit Downvote Analyzer</title>
  {{HEAD}}
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&display=swap');

    :root {
      --bg: #030712;
      --card: #111827;
      --card-2: #1f2937;
      --ink: #f3f4f6;
      --muted: #9ca3af;
      --accent: #60a5fa;
      --score: #ff4444;
      --border: #374151;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1100px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 28px;
    }

    h1 {
      text-align: center;
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
    }

    .section-header {
      text-align: center;
    }

    .section-header h2 {
      margin: 0 0 8px;
    }

    .subtitle,
    .meta {
      color: var(--muted);
      margin: 0;
      font-size: 0.9rem;
    }

    .tabs {
      display: flex;
      justify-content: center;
      gap: 6px;
      padding: 6px;
      background: var(--card);
      border-radius: 14px;
    }

    .tab {
      padding: 12px 20px;
      color: var(--muted);
      text-decoration: none;
      font-weight: 600;
      border-bottom: 2px solid transparent;
    }

    .tab.active {
      color: white;
      border-bottom-color: #3b82f6;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
      gap: 24px;
    }

    .card {
      background: var(--card);
      border-radius: 14px;
      padding: 24px;
      display: grid;
      gap: 12px;
    }

    .accent-bar {
      height: 4px;
      width: 80px;
      background: #ef4444;
    }

    .score {
      color: var(--score);
      font-size: 1.8rem;
      font-weight: 700;
      font-family: ui-monospace, monospace;
    }

    .champion-body,
    .category-body,
    .comment-card {
      display: flex;
      gap: 20px;
    }

    .comment-body {
      margin: 6px 0;
      overflow-wrap: anywhere;
    }

    .clamp {
      display: -webkit-box;
      -webkit-line-clamp: 3;
      -webkit-box-orient: vertical;
      overflow: hidden;
    }

    .card-footer {
      display: flex;
      justify-content: space-between;
      align-items: center;
      border-top: 1px solid var(--border);
      padding-top: 12px;
      gap: 12px;
    }

    .link {
      color: var(--accent);
      text-decoration: none;
    }

    .comment-card {
      background: var(--card-2);
      border-radius: 14px;
      padding: 20px;
      margin-top: 20px;
    }

    .comment-card.first {
      border-left: 4px solid #ef4444;
      margin-top: 0;
    }

    .modal-backdrop {
      position: fixed;
      inset: 0;
      background: rgba(0, 0, 0, 0.5);
      display: grid;
      place-items: center;
    }

    .modal {
      background: var(--card);
      border-radius: 14px;
      width: min(900px, 92vw);
      max-height: 80vh;
      overflow: hidden;
    }

    .modal-header {
      display: flex;
      justify-content: space-between;
      align-items: center;
      padding: 20px 24px;
      border-bottom: 1px solid var(--border);
    }

    .modal-header .close {
      color: var(--muted);
      font-size: 1.6rem;
      text-decoration: none;
    }

    .modal-content {
      overflow-y: auto;
      max-height: calc(80vh - 90px);
      padding: 24px;
    }

    .leaderboard ol {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 14px;
    }

    .leader-row {
      display: flex;
      align-items: center;
      gap: 12px;
    }

    .leader-row .score {
      margin-left: auto;
      font-size: 1.2rem;
    }

    .subreddit-card {
      text-align: center;
      justify-items: center;
    }

    .average {
      color: #f87171;
    }

    .trend-picker {
      display: flex;
      gap: 10px;
      margin-bottom: 20px;
    }

    select,
    .btn {
      background: var(--card-2);
      color: white;
      border: 1px solid var(--border);
      border-radius: 8px;
      padding: 8px 14px;
      font: inherit;
      cursor: pointer;
    }

    .trend-card {
      margin-bottom: 24px;
    }

    .chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    .chart-line {
      fill: none;
      stroke: var(--score);
      stroke-width: 2;
    }

    .chart-point {
      fill: var(--card);
      stroke: var(--score);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: var(--border);
      stroke-dasharray: 3 3;
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .status-screen {
      min-height: 80vh;
      display: grid;
      place-items: center;
      align-content: center;
      gap: 20px;
    }

    .error,
    .status.error {
      color: #ef4444;
    }

    .empty {
      color: var(--muted);
      text-align: center;
    }
  </style>
</head>
<body>
  {{BODY}}
</body>
</html>
"#;
