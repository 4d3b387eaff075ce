// src/services/affiliate_service.rs
use crate::config::Config;
use crate::errors::StyleSeerError;
use crate::models::{AffiliateQuery, AffiliateResponse};
use async_trait::async_trait;
use reqwest::Client;

/// The hosted affiliate shopping search, one brand/category per call.
#[async_trait]
pub trait AffiliateSearch: Send + Sync {
    async fn search(&self, query: &AffiliateQuery) -> Result<AffiliateResponse, StyleSeerError>;
}

pub struct AffiliateService {
    endpoint: String,
    client: Client,
}

impl AffiliateService {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.affiliate_search_endpoint())
    }
}

/// Query-string pairs in the order the search endpoint documents them.
pub fn query_params(query: &AffiliateQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("howMany", query.how_many.to_string()),
        ("category", query.category.clone()),
        ("brand", query.brand.clone()),
        ("gender", query.gender.as_str().to_string()),
        ("country", query.country.clone()),
    ];
    if let Some(min_price) = query.price.min_price {
        params.push(("minPrice", min_price.to_string()));
    }
    if let Some(max_price) = query.price.max_price {
        params.push(("maxPrice", max_price.to_string()));
    }
    params
}

#[async_trait]
impl AffiliateSearch for AffiliateService {
    async fn search(&self, query: &AffiliateQuery) -> Result<AffiliateResponse, StyleSeerError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&query_params(query))
            .send()
            .await
            .map_err(|e| StyleSeerError::Network(format!("Affiliate search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StyleSeerError::Network(format!(
                "Affiliate search failed with status: {}",
                status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| StyleSeerError::Network(format!("Failed to read affiliate response: {}", e)))?;

        serde_json::from_slice(&body)
            .map_err(|e| StyleSeerError::Validation(format!("Unexpected affiliate response: {}", e)))
    }
}
