use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: String,
    pub score: i64,
    pub author: String,
    pub subreddit: String,
    pub body: String,
    #[serde(default)]
    pub created_utc: Option<String>,
    pub permalink: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubredditTotal {
    pub subreddit: String,
    pub total_downvotes: i64,
    pub total_comments: u64,
    pub recorded_date: String,
}

impl SubredditTotal {
    /// Mean downvotes per downvoted comment as a magnitude, one decimal.
    pub fn average_downvotes(&self) -> Option<f64> {
        if self.total_comments == 0 {
            return None;
        }
        let average = self.total_downvotes as f64 / self.total_comments as f64;
        Some(((average * 10.0).round() / 10.0).abs())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllTimeSubredditTotal {
    pub subreddit: String,
    pub all_time_downvotes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub downvotes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ChampionResponse {
    #[serde(default)]
    pub champion: Option<Comment>,
}

#[derive(Debug, Deserialize)]
pub struct TotalsResponse<T> {
    pub totals: Vec<T>,
}

/// `{ "comments": { "<subreddit>": Comment } }`, kept in response order.
#[derive(Debug, Deserialize)]
pub struct BatchCommentsResponse {
    #[serde(deserialize_with = "ordered_entries")]
    pub comments: Vec<(String, Comment)>,
}

/// `{ "trends": { "<subreddit>": [TrendPoint] } }`, kept in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTrends {
    #[serde(deserialize_with = "ordered_entries", serialize_with = "entries_as_map")]
    pub trends: Vec<(String, Vec<TrendPoint>)>,
}

impl WeeklyTrends {
    pub fn points_for(&self, subreddit: &str) -> Option<&[TrendPoint]> {
        self.trends
            .iter()
            .find(|(name, _)| name == subreddit)
            .map(|(_, points)| points.as_slice())
    }
}

/// Comments bucketed per category, in category declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorizedComments {
    pub buckets: Vec<CategoryBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBucket {
    pub category: String,
    pub comments: Vec<Comment>,
}

impl CategoryBucket {
    /// Most downvoted comment of the bucket once it has been sorted.
    pub fn worst(&self) -> Option<&Comment> {
        self.comments.first()
    }
}

impl CategorizedComments {
    pub fn get(&self, category: &str) -> Option<&CategoryBucket> {
        self.buckets.iter().find(|bucket| bucket.category == category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardData {
    pub champion: Option<Comment>,
    pub all_time_totals: Vec<AllTimeSubredditTotal>,
    pub subreddit_totals: Vec<SubredditTotal>,
    pub categorized: CategorizedComments,
}

fn ordered_entries<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct EntriesVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a JSON object keyed by subreddit")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, V>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

#[allow(clippy::ptr_arg)]
fn entries_as_map<S, V>(entries: &Vec<(String, V)>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_map(entries.iter().map(|(key, value)| (key, value)))
}
