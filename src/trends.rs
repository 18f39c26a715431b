use crate::models::{TrendPoint, WeeklyTrends};
use crate::taxonomy::Taxonomy;
use chrono::NaiveDate;

pub const DEFAULT_TREND_CATEGORY: &str = "Cities";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubredditSeries {
    pub subreddit: String,
    pub points: Vec<ChartPoint>,
}

/// Chronological chart points with downvotes shown as a positive magnitude.
pub fn chart_series(points: &[TrendPoint]) -> Vec<ChartPoint> {
    let mut dated: Vec<(Option<NaiveDate>, &TrendPoint)> = points
        .iter()
        .map(|point| (parse_date(&point.date), point))
        .collect();
    // Unparsable dates sort first; the sort is stable so they keep their order.
    dated.sort_by_key(|(date, _)| *date);

    dated
        .into_iter()
        .map(|(date, point)| ChartPoint {
            label: date
                .map(|date| date.format("%b %-d").to_string())
                .unwrap_or_else(|| point.date.clone()),
            value: point.downvotes.unsigned_abs() as f64,
        })
        .collect()
}

/// One series per subreddit of `category`, in taxonomy order.
pub fn series_for_category(
    taxonomy: &Taxonomy<'_>,
    trends: &WeeklyTrends,
    category: &str,
) -> Vec<SubredditSeries> {
    let Some(category) = taxonomy.get(category) else {
        return Vec::new();
    };
    category
        .subreddits
        .iter()
        .map(|subreddit| SubredditSeries {
            subreddit: subreddit.to_string(),
            points: trends
                .points_for(subreddit)
                .map(chart_series)
                .unwrap_or_default(),
        })
        .collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
