// src/services/llm_service.rs
use crate::catalog::{CLOTHING_CATEGORIES, CLOTHING_STYLES, brand_list};
use crate::config::Config;
use crate::errors::StyleSeerError;
use crate::models::*;
use crate::services::image_processor::DataUri;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const MAX_TAG_BRANDS: usize = 10;

/// The hosted vision model, seen from the flows.
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    async fn analyze_clothing(
        &self,
        photo_data_uri: &str,
        config: &AnalysisConfig,
    ) -> Result<AnalysisResult, StyleSeerError>;

    async fn recommend_brands(
        &self,
        tags: &[String],
        include_lingerie: bool,
    ) -> Result<Vec<String>, StyleSeerError>;
}

/// Shape the model must answer with. Anything else is a validation failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClothingAnalysis {
    clothing_items: Vec<String>,
    dominant_colors: Vec<String>,
    style: String,
    /// Only requested when the user left gender on `Auto`; checked in `parse_analysis`.
    #[serde(default)]
    gender_department: Option<GenderDepartment>,
    #[serde(default)]
    identified_brand: Option<String>,
    brand_is_explicit: bool,
    approximated_brands: Vec<String>,
    alternative_brands: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBrandRecommendation {
    recommended_brands: Vec<String>,
}

pub struct LLMService {
    api_key: Option<String>,
    base_url: String,
    default_model: String,
    client: Client,
}

impl LLMService {
    pub fn new(api_key: Option<String>, base_url: String, default_model: String) -> Self {
        Self {
            api_key,
            base_url,
            default_model,
            client: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.openrouter_api_key.clone(),
            config.openrouter_base_url.clone(),
            config.default_model.clone(),
        )
    }

    async fn chat_completion(
        &self,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, StyleSeerError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| StyleSeerError::LLM("OpenRouter API key not configured".to_string()))?;

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| StyleSeerError::Network(format!("OpenRouter request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StyleSeerError::LLM(format!(
                "OpenRouter error: {} - {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| StyleSeerError::LLM(format!("Failed to parse OpenRouter response: {}", e)))
    }
}

#[async_trait]
impl VisionAnalyzer for LLMService {
    async fn analyze_clothing(
        &self,
        photo_data_uri: &str,
        config: &AnalysisConfig,
    ) -> Result<AnalysisResult, StyleSeerError> {
        DataUri::parse(photo_data_uri)?;

        let model = config
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());
        let prompt = build_analysis_prompt(config);

        let result = self
            .chat_completion(json!({
                "model": model,
                "messages": [{
                    "role": "user",
                    "content": [
                        { "type": "text", "text": prompt },
                        { "type": "image_url", "image_url": { "url": photo_data_uri } }
                    ]
                }],
                "usage": { "include": true }
            }))
            .await?;

        let content = message_content(&result)?;
        let usage = parse_usage(&result["usage"]);
        parse_analysis(content, config, usage)
    }

    async fn recommend_brands(
        &self,
        tags: &[String],
        include_lingerie: bool,
    ) -> Result<Vec<String>, StyleSeerError> {
        let prompt = build_tags_prompt(tags, include_lingerie);

        let result = self
            .chat_completion(json!({
                "model": self.default_model,
                "messages": [{ "role": "user", "content": prompt }],
                "response_format": { "type": "json_object" }
            }))
            .await?;

        let content = message_content(&result)?;
        let raw: RawBrandRecommendation = serde_json::from_str(strip_code_fence(content))
            .map_err(|e| StyleSeerError::Validation(format!("Invalid brand recommendation: {}", e)))?;

        let mut brands: Vec<String> = raw
            .recommended_brands
            .into_iter()
            .filter(|brand| is_listed_brand(brand, include_lingerie))
            .collect();
        brands.truncate(MAX_TAG_BRANDS);
        Ok(brands)
    }
}

fn message_content(result: &serde_json::Value) -> Result<&str, StyleSeerError> {
    result["choices"][0]["message"]["content"]
        .as_str()
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| StyleSeerError::LLM("No analysis content returned from OpenRouter".to_string()))
}

fn parse_usage(usage: &serde_json::Value) -> Option<Usage> {
    Some(Usage {
        total_tokens: usage["total_tokens"].as_u64()?,
        cost: usage["cost"].as_f64().unwrap_or(0.0),
    })
}

/// Models often wrap JSON answers in a markdown fence.
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

pub fn build_analysis_prompt(config: &AnalysisConfig) -> String {
    let user_gender = config.gender_department.explicit();
    let include_lingerie =
        user_gender == Some(GenderDepartment::Female) && config.include_lingerie;
    let brands = brand_list(include_lingerie);
    let country = config.country.as_deref().unwrap_or("United States");

    let mut fields = serde_json::Map::new();
    fields.insert(
        "clothingItems".into(),
        json!(format!(
            "List the clothing items from this list: {}",
            CLOTHING_CATEGORIES.join(", ")
        )),
    );
    fields.insert(
        "dominantColors".into(),
        json!("List the dominant colors of the clothing."),
    );
    fields.insert(
        "style".into(),
        json!(format!(
            "The overall style, one of: {}",
            CLOTHING_STYLES.join(", ")
        )),
    );
    if user_gender.is_none() {
        fields.insert(
            "genderDepartment".into(),
            json!("Determine if the item is Male, Female, or Unisex. Prefer 'Male' or 'Female' over 'Unisex'."),
        );
    }
    fields.insert(
        "brandIsExplicit".into(),
        json!("True if a brand logo is clearly visible, false otherwise."),
    );
    fields.insert(
        "identifiedBrand".into(),
        json!("The brand name if a logo is visible."),
    );
    fields.insert(
        "approximatedBrands".into(),
        json!("If no brand is clear, suggest up to 5 stylistic matches from the Preferred Brand List."),
    );
    fields.insert(
        "alternativeBrands".into(),
        json!("Suggest up to 5 similar style brands from the Preferred Brand List."),
    );

    let fields = serde_json::to_string_pretty(&serde_json::Value::Object(fields))
        .unwrap_or_default();

    format!(
        "You are an AI fashion assistant. Analyze the clothing in the image and provide the output in JSON format.\n\
         The user's country is {country}. When suggesting brands, prioritize those that are most relevant to this country \
         (e.g., brands with a 'UK' suffix for 'United Kingdom', or brands known to be popular in that region).\n\
         Respond with a valid JSON object containing the following fields:\n\
         {fields}\n\n\
         Preferred Brand List: {}",
        brands.join(", ")
    )
}

pub fn build_tags_prompt(tags: &[String], include_lingerie: bool) -> String {
    format!(
        "You are an AI fashion assistant. Based on the following fashion tags, recommend up to {MAX_TAG_BRANDS} suitable clothing brands.\n\
         The user is interested in: {}.\n\n\
         Choose from the following list of preferred brands: {}.\n\n\
         Return a JSON object with the brand names in the 'recommendedBrands' field.",
        tags.join(", "),
        brand_list(include_lingerie).join(", ")
    )
}

/// Validates the model's JSON and applies the brand and gender rules.
pub fn parse_analysis(
    content: &str,
    config: &AnalysisConfig,
    usage: Option<Usage>,
) -> Result<AnalysisResult, StyleSeerError> {
    let raw: RawClothingAnalysis = serde_json::from_str(strip_code_fence(content)).map_err(|e| {
        StyleSeerError::Validation(format!("Received invalid JSON from the analysis model: {}", e))
    })?;

    let gender_department = config
        .gender_department
        .explicit()
        .or(raw.gender_department)
        .ok_or_else(|| {
            StyleSeerError::Validation("Analysis is missing genderDepartment".to_string())
        })?;

    let identified_brand = raw
        .identified_brand
        .filter(|brand| raw.brand_is_explicit && !brand.trim().is_empty());
    let approximated_brands = if identified_brand.is_some() {
        Vec::new()
    } else {
        raw.approximated_brands
    };

    Ok(AnalysisResult {
        clothing_items: raw.clothing_items,
        dominant_colors: raw.dominant_colors,
        style: raw.style,
        identified_brand,
        brand_is_explicit: raw.brand_is_explicit,
        approximated_brands,
        alternative_brands: raw.alternative_brands,
        gender_department,
        usage,
    })
}

/// True when `brand` is one the model was allowed to pick, ignoring case.
pub fn is_listed_brand(brand: &str, include_lingerie: bool) -> bool {
    brand_list(include_lingerie)
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(brand.trim()))
}
