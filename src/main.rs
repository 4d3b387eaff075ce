// src/main.rs
use actix_web::{App, HttpServer, middleware, web};
use log::{info, warn};
use std::sync::Arc;

use styleseer::AppState;
use styleseer::config::Config;
use styleseer::handlers::{json_config, routes};
use styleseer::services::{
    AffiliateService, HistoryService, ImageProcessor, KeyValueStore, LLMService, MemoryStore,
    RedisStore,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting StyleSeer service...");

    let config = Config::from_env()?;
    if config.openrouter_api_key.is_none() {
        warn!("OPENROUTER_API_KEY is not set; image analysis will fail until it is");
    }

    let store: Arc<dyn KeyValueStore> = match &config.redis_url {
        Some(url) => {
            info!("Keeping history in Redis");
            Arc::new(RedisStore::new(url).await?)
        }
        None => {
            info!("REDIS_URL not set; keeping history in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let app_state = AppState {
        llm_service: Arc::new(LLMService::from_config(&config)),
        affiliate_service: Arc::new(AffiliateService::from_config(&config)),
        history_service: Arc::new(HistoryService::new(store)),
        image_processor: Arc::new(ImageProcessor::new()),
        config: Arc::new(config),
    };

    let bind_addr = app_state.config.bind_addr.clone();
    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(json_config(&app_state.config))
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
