// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience classification returned by the vision model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenderDepartment {
    Male,
    Female,
    Unisex,
}

impl GenderDepartment {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenderDepartment::Male => "Male",
            GenderDepartment::Female => "Female",
            GenderDepartment::Unisex => "Unisex",
        }
    }
}

/// What the user asked for. `Auto` lets the model decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GenderPreference {
    Male,
    Female,
    Unisex,
    #[default]
    Auto,
}

impl GenderPreference {
    /// The department the user fixed explicitly, if any.
    pub fn explicit(&self) -> Option<GenderDepartment> {
        match self {
            GenderPreference::Male => Some(GenderDepartment::Male),
            GenderPreference::Female => Some(GenderDepartment::Female),
            GenderPreference::Unisex => Some(GenderDepartment::Unisex),
            GenderPreference::Auto => None,
        }
    }

    /// Department sent to the affiliate search; `Auto` searches unisex.
    pub fn for_search(&self) -> GenderDepartment {
        self.explicit().unwrap_or(GenderDepartment::Unisex)
    }
}

impl From<GenderDepartment> for GenderPreference {
    fn from(value: GenderDepartment) -> Self {
        match value {
            GenderDepartment::Male => GenderPreference::Male,
            GenderDepartment::Female => GenderPreference::Female,
            GenderDepartment::Unisex => GenderPreference::Unisex,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    #[serde(default)]
    pub gender_department: GenderPreference,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub include_lingerie: bool,
    /// Overrides the configured default vision model.
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub total_tokens: u64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub clothing_items: Vec<String>,
    pub dominant_colors: Vec<String>,
    pub style: String,
    pub identified_brand: Option<String>,
    pub brand_is_explicit: bool,
    pub approximated_brands: Vec<String>,
    pub alternative_brands: Vec<String>,
    pub gender_department: GenderDepartment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl AnalysisResult {
    /// True when the model found anything worth showing.
    pub fn has_content(&self) -> bool {
        !self.clothing_items.is_empty()
            || !self.dominant_colors.is_empty()
            || !self.style.trim().is_empty()
            || self.identified_brand.is_some()
    }

    /// Every brand the analysis mentions: approximated, alternative, then identified.
    pub fn brand_mentions(&self) -> impl Iterator<Item = &String> {
        self.approximated_brands
            .iter()
            .chain(self.alternative_brands.iter())
            .chain(self.identified_brand.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCount {
    pub item: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleCount {
    pub style: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosetAnalysisResult {
    pub dominant_clothing_items: Vec<ItemCount>,
    pub dominant_styles: Vec<StyleCount>,
    pub recommended_brands: Vec<String>,
}

impl ClosetAnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.dominant_clothing_items.is_empty()
            && self.dominant_styles.is_empty()
            && self.recommended_brands.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedItem {
    pub product_name: String,
    pub merchant_name: String,
    pub item_price: String,
    pub vendor_link: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplementaryItem {
    pub category: String,
    pub item_title: String,
    pub vendor_link: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogEvent {
    Invoke,
    Response,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: LogEvent,
    pub flow: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    Single,
    Closet,
}

impl HistoryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryMode::Single => "single",
            HistoryMode::Closet => "closet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "result", rename_all = "lowercase")]
pub enum HistoryRecord {
    Single(AnalysisResult),
    Closet(ClosetAnalysisResult),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub image_uris: Vec<String>,
    pub analysis_result: HistoryRecord,
}

impl HistoryEntry {
    pub fn new(image_uris: Vec<String>, analysis_result: HistoryRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            image_uris,
            analysis_result,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBounds {
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
}

/// One affiliate search call: one brand, one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateQuery {
    pub how_many: u32,
    pub category: String,
    pub brand: String,
    pub gender: GenderDepartment,
    pub country: String,
    #[serde(flatten)]
    pub price: PriceBounds,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateResponse {
    #[serde(rename = "imageURLs")]
    pub image_urls: Vec<String>,
    #[serde(rename = "URLs")]
    pub urls: Vec<String>,
    #[serde(default)]
    pub product_names: Option<Vec<String>>,
    #[serde(default)]
    pub merchant_names: Option<Vec<String>>,
    #[serde(default)]
    pub item_prices: Option<Vec<String>>,
}

// Request bodies accepted by the HTTP API.

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub photo_data_uri: String,
    #[serde(flatten)]
    pub config: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosetAnalyzeRequest {
    pub photo_data_uris: Vec<String>,
    #[serde(flatten)]
    pub config: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub brands: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub dominant_clothing_items: Vec<String>,
    #[serde(default)]
    pub gender: GenderPreference,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(flatten)]
    pub price: PriceBounds,
    #[serde(default)]
    pub how_many: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplementaryRequest {
    pub original_categories: Vec<String>,
    pub gender: GenderDepartment,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub num_per_category: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandsFromTagsRequest {
    pub tags: Vec<String>,
    #[serde(default)]
    pub include_lingerie: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPreferenceRequest {
    pub enabled: bool,
}
