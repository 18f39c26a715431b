use crate::client::ApiError;
use crate::models::{DashboardData, WeeklyTrends};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch data. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveView {
    #[default]
    Categories,
    Subreddits,
    Trends,
}

impl ActiveView {
    pub const ALL: [ActiveView; 3] = [Self::Categories, Self::Subreddits, Self::Trends];

    pub fn key(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Subreddits => "subreddits",
            Self::Trends => "trends",
        }
    }

    pub fn tab_label(self) -> &'static str {
        match self {
            Self::Categories => "Categories",
            Self::Subreddits => "Subreddit Totals",
            Self::Trends => "Weekly Trends",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view '{0}'")]
pub struct UnknownView(pub String);

impl FromStr for ActiveView {
    type Err = UnknownView;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|view| view.key() == value)
            .ok_or_else(|| UnknownView(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrendsState {
    NotRequested,
    Loading,
    Ready(Arc<WeeklyTrends>),
    Error(String),
}

/// Identifies one load cycle; results carrying an older ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Dashboard UI state: the load status machine, the last published view
/// model, the selected tab and the independently loaded trend data.
#[derive(Debug)]
pub struct ViewController {
    status: LoadStatus,
    data: Option<Arc<DashboardData>>,
    active_view: ActiveView,
    trends: TrendsState,
    generation: u64,
    trends_generation: u64,
    mounted: bool,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewController {
    pub fn new() -> Self {
        Self {
            status: LoadStatus::Idle,
            data: None,
            active_view: ActiveView::default(),
            trends: TrendsState::NotRequested,
            generation: 0,
            trends_generation: 0,
            mounted: true,
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn data(&self) -> Option<Arc<DashboardData>> {
        self.data.clone()
    }

    pub fn active_view(&self) -> ActiveView {
        self.active_view
    }

    pub fn trends(&self) -> &TrendsState {
        &self.trends
    }

    pub fn error_message(&self) -> Option<&'static str> {
        (self.status == LoadStatus::Error).then_some(FETCH_ERROR_MESSAGE)
    }

    /// Starts a dashboard load cycle. Returns `None` once unmounted.
    ///
    /// A new cycle also discards the trend data, so the next visit to the
    /// trends view fetches again and any trend request in flight goes stale.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if !self.mounted {
            return None;
        }
        self.generation += 1;
        self.status = LoadStatus::Loading;
        self.trends_generation += 1;
        self.trends = TrendsState::NotRequested;
        Some(LoadTicket {
            generation: self.generation,
        })
    }

    /// Publishes the outcome of a load cycle. Returns whether it was applied.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<DashboardData, ApiError>,
    ) -> bool {
        if !self.mounted || ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                "ignoring stale dashboard load"
            );
            return false;
        }
        match result {
            Ok(data) => {
                self.data = Some(Arc::new(data));
                self.status = LoadStatus::Ready;
                info!("dashboard ready");
            }
            Err(err) => {
                error!("dashboard load failed: {err}");
                self.status = LoadStatus::Error;
            }
        }
        true
    }

    /// Switches tabs. Returns a ticket when the trend data must be fetched,
    /// which only happens on the first trends visit of a load cycle.
    pub fn select_view(&mut self, view: ActiveView) -> Option<LoadTicket> {
        self.active_view = view;
        if view != ActiveView::Trends || self.trends != TrendsState::NotRequested {
            return None;
        }
        self.begin_trends_load()
    }

    pub fn begin_trends_load(&mut self) -> Option<LoadTicket> {
        if !self.mounted {
            return None;
        }
        self.trends_generation += 1;
        self.trends = TrendsState::Loading;
        Some(LoadTicket {
            generation: self.trends_generation,
        })
    }

    pub fn finish_trends(
        &mut self,
        ticket: LoadTicket,
        result: Result<WeeklyTrends, ApiError>,
    ) -> bool {
        if !self.mounted || ticket.generation != self.trends_generation {
            debug!(generation = ticket.generation, "ignoring stale trends load");
            return false;
        }
        self.trends = match result {
            Ok(trends) => TrendsState::Ready(Arc::new(trends)),
            Err(err) => {
                error!("error fetching trends: {err}");
                TrendsState::Error(err.to_string())
            }
        };
        true
    }

    /// Detaches the controller; later results are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }
}
