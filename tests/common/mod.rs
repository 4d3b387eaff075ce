use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use styleseer::AppState;
use styleseer::config::Config;
use styleseer::errors::StyleSeerError;
use styleseer::models::*;
use styleseer::services::{
    AffiliateSearch, HistoryService, ImageProcessor, MemoryStore, VisionAnalyzer,
};

pub fn photo(name: &str) -> String {
    format!("data:image/jpeg;base64,{name}")
}

pub fn analysis(items: &[&str], style: &str, brands: &[&str]) -> AnalysisResult {
    AnalysisResult {
        clothing_items: items.iter().map(|s| s.to_string()).collect(),
        dominant_colors: vec!["Black".to_string()],
        style: style.to_string(),
        identified_brand: None,
        brand_is_explicit: false,
        approximated_brands: brands.iter().map(|s| s.to_string()).collect(),
        alternative_brands: Vec::new(),
        gender_department: GenderDepartment::Female,
        usage: None,
    }
}

pub fn found(brand: &str, count: usize) -> AffiliateResponse {
    AffiliateResponse {
        image_urls: (0..count)
            .map(|i| format!("https://img.example/{brand}/{i}.jpg"))
            .collect(),
        urls: (0..count)
            .map(|i| format!("https://shop.example/{brand}/{i}"))
            .collect(),
        product_names: None,
        merchant_names: Some(vec![brand.to_string(); count]),
        item_prices: None,
    }
}

#[derive(Default)]
pub struct StubAnalyzer {
    pub answers: HashMap<String, AnalysisResult>,
    pub brands: Option<Vec<String>>,
}

#[async_trait]
impl VisionAnalyzer for StubAnalyzer {
    async fn analyze_clothing(
        &self,
        photo_data_uri: &str,
        _config: &AnalysisConfig,
    ) -> Result<AnalysisResult, StyleSeerError> {
        self.answers
            .get(photo_data_uri)
            .cloned()
            .ok_or_else(|| StyleSeerError::LLM("model unavailable".to_string()))
    }

    async fn recommend_brands(
        &self,
        _tags: &[String],
        _include_lingerie: bool,
    ) -> Result<Vec<String>, StyleSeerError> {
        self.brands
            .clone()
            .ok_or_else(|| StyleSeerError::LLM("model unavailable".to_string()))
    }
}

/// Answers by brand name; unknown brands fail with a 500 from the "remote" service.
#[derive(Default)]
pub struct StubSearch {
    pub by_brand: HashMap<String, AffiliateResponse>,
    pub fallback: Option<AffiliateResponse>,
    pub queries: Mutex<Vec<AffiliateQuery>>,
}

#[async_trait]
impl AffiliateSearch for StubSearch {
    async fn search(&self, query: &AffiliateQuery) -> Result<AffiliateResponse, StyleSeerError> {
        self.queries.lock().unwrap().push(query.clone());
        self.by_brand
            .get(&query.brand)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| {
                StyleSeerError::Network("Affiliate search failed with status: 500".to_string())
            })
    }
}

pub fn app_state(analyzer: StubAnalyzer, search: Arc<StubSearch>) -> AppState {
    AppState {
        config: Arc::new(Config::default()),
        llm_service: Arc::new(analyzer),
        affiliate_service: search,
        history_service: Arc::new(HistoryService::new(Arc::new(MemoryStore::new()))),
        image_processor: Arc::new(ImageProcessor::new()),
    }
}
