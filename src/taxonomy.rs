/// A named group of subreddits shown together on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub subreddits: &'static [&'static str],
}

pub const CATEGORIES: &[Category] = &[
    Category {
        name: "Entertainment",
        subreddits: &["movies", "television", "music", "gaming", "funny", "amitheasshole"],
    },
    Category {
        name: "Cities",
        subreddits: &["sacramento", "seattle", "vancouver", "denver", "austin"],
    },
    Category {
        name: "News",
        subreddits: &["worldnews", "news", "politics", "science", "technology"],
    },
    Category {
        name: "Hobbies",
        subreddits: &["golf", "thriftstorehauls", "travel", "aviation", "coins"],
    },
    Category {
        name: "Sports",
        subreddits: &["nba", "nfl", "nhl", "baseball", "formula1"],
    },
];

pub static TAXONOMY: Taxonomy<'static> = Taxonomy::new(CATEGORIES);

/// Ordered, read-only view over a category table.
///
/// Lookups resolve a subreddit to the first category in declaration order
/// that lists it, so overlapping tables stay deterministic.
#[derive(Debug, Clone, Copy)]
pub struct Taxonomy<'a> {
    categories: &'a [Category],
}

/// A subreddit listed under more than one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub subreddit: &'static str,
    pub categories: Vec<&'static str>,
}

impl<'a> Taxonomy<'a> {
    pub const fn new(categories: &'a [Category]) -> Self {
        Self { categories }
    }

    pub fn category_names(&self) -> impl Iterator<Item = &'static str> + 'a {
        self.categories.iter().map(|category| category.name)
    }

    pub fn get(&self, name: &str) -> Option<&'a Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn all_subreddits(&self) -> Vec<&'static str> {
        self.categories
            .iter()
            .flat_map(|category| category.subreddits.iter().copied())
            .collect()
    }

    pub fn category_for_subreddit(&self, subreddit: &str) -> Option<&'static str> {
        self.categories
            .iter()
            .find(|category| category.subreddits.contains(&subreddit))
            .map(|category| category.name)
    }

    /// Subreddits that appear in more than one category, in first-seen order.
    pub fn overlaps(&self) -> Vec<Overlap> {
        let mut overlaps: Vec<Overlap> = Vec::new();
        for subreddit in self.all_subreddits() {
            if overlaps.iter().any(|overlap| overlap.subreddit == subreddit) {
                continue;
            }
            let categories: Vec<&'static str> = self
                .categories
                .iter()
                .filter(|category| category.subreddits.contains(&subreddit))
                .map(|category| category.name)
                .collect();
            let listings = self
                .categories
                .iter()
                .flat_map(|category| category.subreddits.iter())
                .filter(|candidate| **candidate == subreddit)
                .count();
            if listings > 1 {
                overlaps.push(Overlap { subreddit, categories });
            }
        }
        overlaps
    }
}
