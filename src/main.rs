use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    response::Redirect,
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use fairlink::services::discover::DiscoverService;
use fairlink::services::population_feed::PopulationFeed;
use fairlink::services::store::{ConnectionStore, SqliteStore};
use fairlink::web::middleware::auth as auth_middleware;
use fairlink::web::routes::{discover, interests, matches};
use fairlink::web::AppState;

#[tokio::main]
async fn main() {
    // Laad .env bestand
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt::init();

    // 2. Verbind met de Database
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL moet in .env staan");
    println!("Verbinden met database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Kan niet verbinden met DB");

    sqlx::raw_sql(include_str!("../db/schema.sql"))
        .execute(&pool)
        .await
        .expect("Kan schema niet toepassen");

    // 3. Population feed + orchestrator
    let feed = PopulationFeed::new();
    tokio::spawn(feed.clone().run(pool.clone()));
    feed.nudge();

    let store: Arc<dyn ConnectionStore> = Arc::new(SqliteStore::new(pool.clone()));
    let state = AppState {
        pool,
        store: store.clone(),
        feed: feed.clone(),
        discover: DiscoverService::new(store, feed),
    };

    // 4. Protected routes onder één middleware layer
    let protected_routes = Router::new()
        .route("/discover", get(discover::discover_handler))
        .route("/discover/swipe", post(discover::swipe_handler))
        .route("/matches", get(matches::matches_handler))
        .route("/interests", post(interests::save_interests_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    let app = Router::new()
        .route("/", get(|| async { Redirect::to("/discover") }))
        .merge(protected_routes)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        .with_state(state);

    // 5. Start de server (met fallback poort)
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Kan host/port niet parsen");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!(
                "⚠️  Kon niet binden op {}: {}. Probeer fallback {}:{}",
                addr,
                e,
                host,
                port + 1
            );
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("Kan fallback niet parsen");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Kan niet binden op fallback poort")
        }
    };

    let bound_addr = listener.local_addr().unwrap();
    println!(
        "🚀 Server draait op http://{} (build {})",
        bound_addr,
        env!("FAIRLINK_BUILD_ID")
    );

    axum::serve(listener, app).await.unwrap();
}
