use crate::client::ApiClient;
use crate::controller::{LoadTicket, ViewController};
use crate::pipeline::load_dashboard;
use crate::taxonomy::Taxonomy;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub client: ApiClient,
    pub taxonomy: Taxonomy<'static>,
    pub controller: Arc<Mutex<ViewController>>,
}

impl AppState {
    pub fn new(client: ApiClient, taxonomy: Taxonomy<'static>) -> Self {
        Self {
            client,
            taxonomy,
            controller: Arc::new(Mutex::new(ViewController::new())),
        }
    }

    /// Starts a dashboard load cycle in the background.
    pub async fn spawn_dashboard_load(&self) {
        let ticket = self.controller.lock().await.begin_load();
        if let Some(ticket) = ticket {
            let state = self.clone();
            tokio::spawn(async move { state.run_dashboard_load(ticket).await });
        }
    }

    pub fn spawn_trends_load(&self, ticket: LoadTicket) {
        let state = self.clone();
        tokio::spawn(async move {
            let result = state.client.weekly_trends().await;
            state.controller.lock().await.finish_trends(ticket, result);
        });
    }

    async fn run_dashboard_load(&self, ticket: LoadTicket) {
        let result = load_dashboard(&self.client, &self.taxonomy).await;
        self.controller.lock().await.finish_load(ticket, result);
    }
}
