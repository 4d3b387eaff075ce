// src/flows/recommend.rs
use crate::errors::StyleSeerError;
use crate::flows::event_log::{FlowLog, failure};
use crate::models::{
    AffiliateQuery, AffiliateResponse, GenderPreference, LogEntry, PriceBounds, RecommendedItem,
};
use crate::services::AffiliateSearch;
use log::{error, warn};
use serde::Serialize;

pub const SEARCH_FLOW: &str = "affiliateSearch";
pub const DEFAULT_COUNTRY: &str = "United States";
pub const DEFAULT_CATEGORY: &str = "clothing";
pub const DEFAULT_HOW_MANY: u32 = 2;
const PLACEHOLDER: &str = "TBD";

#[derive(Debug, Clone)]
pub struct RecommendationRequest {
    pub brands: Vec<String>,
    pub category: String,
    pub gender: GenderPreference,
    pub country: String,
    pub price: PriceBounds,
    pub how_many: u32,
}

impl RecommendationRequest {
    /// Fills the defaults: the most dominant item is the category, `Auto` gender searches unisex.
    pub fn from_api(request: crate::models::RecommendRequest) -> Self {
        let category = request
            .category
            .filter(|c| !c.trim().is_empty())
            .or_else(|| request.dominant_clothing_items.first().cloned())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Self {
            brands: request.brands,
            category,
            gender: request.gender,
            country: request
                .country
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            price: request.price,
            how_many: request.how_many.unwrap_or(DEFAULT_HOW_MANY),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub recommended_items: Vec<RecommendedItem>,
    pub logs: Vec<LogEntry>,
}

/// Turns parallel response arrays into items. Indices without both URLs are dropped.
pub fn flatten_response(response: &AffiliateResponse) -> Vec<RecommendedItem> {
    let scalar = |values: &Option<Vec<String>>, i: usize| {
        values
            .as_ref()
            .and_then(|v| v.get(i))
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    };

    response
        .image_urls
        .iter()
        .zip(&response.urls)
        .enumerate()
        .map(|(i, (image_url, vendor_link))| RecommendedItem {
            product_name: scalar(&response.product_names, i),
            merchant_name: scalar(&response.merchant_names, i),
            item_price: scalar(&response.item_prices, i),
            vendor_link: vendor_link.clone(),
            image_url: image_url.clone(),
        })
        .collect()
}

fn validate(request: &RecommendationRequest) -> Result<(), StyleSeerError> {
    if request.brands.iter().all(|b| b.trim().is_empty()) {
        return Err(StyleSeerError::Validation(
            "at least one brand is required".to_string(),
        ));
    }
    if request.how_many == 0 {
        return Err(StyleSeerError::Validation(
            "howMany must be at least 1".to_string(),
        ));
    }
    if let (Some(min), Some(max)) = (request.price.min_price, request.price.max_price) {
        if min > max {
            return Err(StyleSeerError::Validation(format!(
                "minPrice {} is above maxPrice {}",
                min, max
            )));
        }
    }
    Ok(())
}

/// One affiliate search per brand, in order. A failed or blank brand is logged and skipped.
pub async fn recommend(
    search: &dyn AffiliateSearch,
    request: &RecommendationRequest,
) -> Result<Recommendations, StyleSeerError> {
    validate(request)?;

    let mut log = FlowLog::new();
    let mut recommended_items = Vec::new();
    let gender = request.gender.for_search();

    for brand in &request.brands {
        if brand.trim().is_empty() {
            warn!("Skipping blank brand in recommendation request");
            log.error(SEARCH_FLOW, failure("brand", brand, "brand name is blank"));
            continue;
        }

        let query = AffiliateQuery {
            how_many: request.how_many,
            category: request.category.clone(),
            brand: brand.clone(),
            gender,
            country: request.country.clone(),
            price: request.price,
        };
        log.invoke(SEARCH_FLOW, &query);

        match search.search(&query).await {
            Ok(response) if response.image_urls.is_empty() => {
                warn!("Empty affiliate response for brand {}", brand);
                log.error(
                    SEARCH_FLOW,
                    format!(
                        "Empty response for brand {}, category: {}",
                        brand, request.category
                    ),
                );
            }
            Ok(response) => {
                log.response(SEARCH_FLOW, &response);
                recommended_items.extend(flatten_response(&response));
            }
            Err(e) => {
                error!("Affiliate search failed for brand {}: {}", brand, e);
                log.error(SEARCH_FLOW, failure("brand", brand, &e));
            }
        }
    }

    Ok(Recommendations {
        recommended_items,
        logs: log.into_entries(),
    })
}
