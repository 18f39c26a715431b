use crate::client::{ApiClient, ApiError};
use crate::models::{CategorizedComments, CategoryBucket, Comment, DashboardData, SubredditTotal};
use crate::taxonomy::Taxonomy;
use tracing::{debug, info};

/// Fetches the four dashboard endpoints and assembles the view model.
///
/// The requests run concurrently; the first failure aborts the whole load and
/// nothing partial is returned.
pub async fn load_dashboard(
    client: &ApiClient,
    taxonomy: &Taxonomy<'_>,
) -> Result<DashboardData, ApiError> {
    let (champion, all_time_totals, batch, day_totals) = tokio::try_join!(
        client.all_time_champion(),
        client.all_time_subreddit_totals(),
        client.comments_batch(),
        client.subreddit_totals(),
    )?;

    let batch_len = batch.len();
    let categorized = categorize(taxonomy, batch);
    let subreddit_totals = latest_day_totals(day_totals);

    info!(
        comments = batch_len,
        day_totals = subreddit_totals.len(),
        all_time_totals = all_time_totals.len(),
        "dashboard data loaded"
    );

    Ok(DashboardData {
        champion,
        all_time_totals,
        subreddit_totals,
        categorized,
    })
}

/// Buckets one-comment-per-subreddit batch entries by category.
///
/// Every category gets a bucket, even an empty one. Each bucket is sorted
/// ascending by score with a stable sort, so ties keep batch order.
pub fn categorize(taxonomy: &Taxonomy<'_>, batch: Vec<(String, Comment)>) -> CategorizedComments {
    let mut buckets: Vec<CategoryBucket> = taxonomy
        .category_names()
        .map(|name| CategoryBucket {
            category: name.to_string(),
            comments: Vec::new(),
        })
        .collect();

    for (subreddit, comment) in batch {
        let Some(category) = taxonomy.category_for_subreddit(&subreddit) else {
            debug!("dropping comment from unmapped subreddit r/{subreddit}");
            continue;
        };
        if let Some(bucket) = buckets.iter_mut().find(|bucket| bucket.category == category) {
            bucket.comments.push(comment);
        }
    }

    for bucket in &mut buckets {
        bucket.comments.sort_by_key(|comment| comment.score);
    }

    CategorizedComments { buckets }
}

/// Keeps only the rows recorded on the same date as the first row.
///
/// The backend returns rows newest first; no maximum is computed here.
pub fn latest_day_totals(rows: Vec<SubredditTotal>) -> Vec<SubredditTotal> {
    let Some(latest) = rows.first().map(|row| row.recorded_date.clone()) else {
        return Vec::new();
    };
    rows.into_iter()
        .filter(|row| row.recorded_date == latest)
        .collect()
}
