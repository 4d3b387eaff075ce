// src/lib.rs
use std::sync::Arc;

pub mod catalog;
pub mod config;
pub mod errors;
pub mod flows;
pub mod handlers;
pub mod models;
pub mod services;
pub mod session;

use crate::config::Config;
use crate::services::{AffiliateSearch, HistoryService, ImageProcessor, VisionAnalyzer};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm_service: Arc<dyn VisionAnalyzer>,
    pub affiliate_service: Arc<dyn AffiliateSearch>,
    pub history_service: Arc<HistoryService>,
    pub image_processor: Arc<ImageProcessor>,
}
