// src/services/mod.rs
pub mod affiliate_service;
pub mod history_service;
pub mod image_processor;
pub mod llm_service;

pub use affiliate_service::{AffiliateSearch, AffiliateService};
pub use history_service::{HistoryService, KeyValueStore, MemoryStore, RedisStore};
pub use image_processor::ImageProcessor;
pub use llm_service::{LLMService, VisionAnalyzer};
