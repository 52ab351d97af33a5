use std::sync::Arc;

use sqlx::SqlitePool;

use crate::services::discover::DiscoverService;
use crate::services::population_feed::PopulationFeed;
use crate::services::store::ConnectionStore;

pub mod middleware;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub store: Arc<dyn ConnectionStore>,
    pub feed: Arc<PopulationFeed>,
    pub discover: Arc<DiscoverService>,
}
