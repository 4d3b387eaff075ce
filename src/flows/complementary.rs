// src/flows/complementary.rs
use crate::catalog::{COMPLEMENTARY_BRANDS, DEFAULT_COMPLEMENTARY_CATEGORIES, complementary_categories};
use crate::errors::StyleSeerError;
use crate::flows::event_log::{FlowLog, failure};
use crate::flows::recommend::{DEFAULT_COUNTRY, SEARCH_FLOW};
use crate::models::{AffiliateQuery, ComplementaryItem, GenderDepartment, LogEntry, PriceBounds};
use crate::services::AffiliateSearch;
use log::error;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

pub const DEFAULT_PER_CATEGORY: u32 = 2;

#[derive(Debug, Clone)]
pub struct ComplementaryRequest {
    pub original_categories: Vec<String>,
    pub gender: GenderDepartment,
    pub country: String,
    pub num_per_category: u32,
}

impl From<crate::models::ComplementaryRequest> for ComplementaryRequest {
    fn from(request: crate::models::ComplementaryRequest) -> Self {
        Self {
            original_categories: request.original_categories,
            gender: request.gender,
            country: request
                .country
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            num_per_category: request.num_per_category.unwrap_or(DEFAULT_PER_CATEGORY),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplementaryItems {
    pub complementary_items: Vec<ComplementaryItem>,
    pub logs: Vec<LogEntry>,
}

/// Categories to search: the union of every original's complements, minus the originals.
pub fn categories_to_find(original_categories: &[String]) -> Vec<&'static str> {
    let mut found: Vec<&'static str> = Vec::new();
    for category in original_categories {
        for &complement in complementary_categories(category.trim()).unwrap_or_default() {
            let already_owned = original_categories
                .iter()
                .any(|original| original.trim() == complement);
            if !already_owned && !found.contains(&complement) {
                found.push(complement);
            }
        }
    }

    if found.is_empty() {
        DEFAULT_COMPLEMENTARY_CATEGORIES.to_vec()
    } else {
        found
    }
}

/// Searches one random brand per complementary category. Failed categories are logged and skipped.
pub async fn find_complementary<R: Rng + ?Sized>(
    search: &dyn AffiliateSearch,
    request: &ComplementaryRequest,
    rng: &mut R,
) -> Result<ComplementaryItems, StyleSeerError> {
    if request.num_per_category == 0 {
        return Err(StyleSeerError::Validation(
            "numPerCategory must be at least 1".to_string(),
        ));
    }

    let mut log = FlowLog::new();
    let mut complementary_items = Vec::new();

    for category in categories_to_find(&request.original_categories) {
        let Some(&brand) = COMPLEMENTARY_BRANDS.choose(&mut *rng) else {
            break;
        };
        let query = AffiliateQuery {
            how_many: request.num_per_category,
            category: category.to_string(),
            brand: brand.to_string(),
            gender: request.gender,
            country: request.country.clone(),
            price: PriceBounds::default(),
        };
        log.invoke(SEARCH_FLOW, &query);

        match search.search(&query).await {
            Ok(response) => {
                log.response(SEARCH_FLOW, &response);
                complementary_items.extend(response.urls.iter().zip(&response.image_urls).map(
                    |(vendor_link, image_url)| ComplementaryItem {
                        category: category.to_string(),
                        item_title: format!("{} {}", brand, category),
                        vendor_link: vendor_link.clone(),
                        image_url: image_url.clone(),
                    },
                ));
            }
            Err(e) => {
                error!(
                    "Error fetching complementary items for category {} and brand {}: {}",
                    category, brand, e
                );
                log.error(SEARCH_FLOW, failure("category", category, &e));
            }
        }
    }

    Ok(ComplementaryItems {
        complementary_items,
        logs: log.into_entries(),
    })
}
