use pretty_assertions::assert_eq;
use serde_json::json;
use styleseer::errors::StyleSeerError;
use styleseer::models::{AnalysisConfig, GenderDepartment, GenderPreference};
use styleseer::services::{LLMService, VisionAnalyzer};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PHOTO: &str = "data:image/png;base64,iVBORw0KGgo=";

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "gen-test",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 900, "completion_tokens": 100, "total_tokens": 1000, "cost": 0.0012}
    })
}

fn service_for(server: &MockServer) -> LLMService {
    LLMService::new(
        Some("test-key".to_string()),
        server.uri(),
        "test/vision-model".to_string(),
    )
}

#[tokio::test]
async fn analysis_is_parsed_and_normalized() {
    let server = MockServer::start().await;
    let content = r#"```json
{
  "clothingItems": ["Jeans", "Tops"],
  "dominantColors": ["Navy", "White"],
  "style": "Casual",
  "genderDepartment": "Male",
  "identifiedBrand": "Levi's",
  "brandIsExplicit": true,
  "approximatedBrands": ["Wrangler"],
  "alternativeBrands": ["Kappa", "PUMA"]
}
```"#;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": "test/vision-model" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .expect(1)
        .mount(&server)
        .await;

    let result = service_for(&server)
        .analyze_clothing(PHOTO, &AnalysisConfig::default())
        .await
        .unwrap();

    assert_eq!(result.clothing_items, vec!["Jeans".to_string(), "Tops".to_string()]);
    assert_eq!(result.identified_brand.as_deref(), Some("Levi's"));
    assert!(result.approximated_brands.is_empty());
    assert_eq!(result.gender_department, GenderDepartment::Male);
    let usage = result.usage.unwrap();
    assert_eq!(usage.total_tokens, 1000);
}

#[tokio::test]
async fn requested_model_and_gender_override_defaults() {
    let server = MockServer::start().await;
    let content = json!({
        "clothingItems": ["Shoes"],
        "dominantColors": ["Black"],
        "style": "Sporty",
        "genderDepartment": "Male",
        "brandIsExplicit": false,
        "identifiedBrand": "NIKE",
        "approximatedBrands": ["NIKE", "PUMA"],
        "alternativeBrands": []
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "other/model" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&content)))
        .expect(1)
        .mount(&server)
        .await;

    let config = AnalysisConfig {
        gender_department: GenderPreference::Female,
        model: Some("other/model".to_string()),
        ..AnalysisConfig::default()
    };
    let result = service_for(&server)
        .analyze_clothing(PHOTO, &config)
        .await
        .unwrap();

    assert_eq!(result.gender_department, GenderDepartment::Female);
    assert_eq!(result.identified_brand, None);
    assert_eq!(result.approximated_brands, vec!["NIKE".to_string(), "PUMA".to_string()]);
}

#[tokio::test]
async fn off_schema_answer_is_a_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("I think it is a jacket.")),
        )
        .mount(&server)
        .await;

    let err = service_for(&server)
        .analyze_clothing(PHOTO, &AnalysisConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StyleSeerError::Validation(_)));
}

#[tokio::test]
async fn provider_error_status_is_an_llm_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .analyze_clothing(PHOTO, &AnalysisConfig::default())
        .await
        .unwrap_err();
    match err {
        StyleSeerError::LLM(message) => assert!(message.contains("invalid key")),
        other => panic!("expected an LLM error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_key_fails_at_first_call_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = LLMService::new(None, server.uri(), "test/vision-model".to_string());
    let err = service
        .analyze_clothing(PHOTO, &AnalysisConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StyleSeerError::LLM(_)));
}

#[tokio::test]
async fn non_image_data_uri_is_rejected_before_the_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = service_for(&server)
        .analyze_clothing("data:text/plain;base64,aGk=", &AnalysisConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StyleSeerError::ImageProcessing(_)));
}

#[tokio::test]
async fn brand_recommendations_keep_only_listed_brands() {
    let server = MockServer::start().await;
    let content = json!({ "recommendedBrands": ["nike", "Made Up Brand", "Kappa"] }).to_string();
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "response_format": { "type": "json_object" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&content)))
        .mount(&server)
        .await;

    let brands = service_for(&server)
        .recommend_brands(&["streetwear".to_string(), "sneakers".to_string()], false)
        .await
        .unwrap();
    assert_eq!(brands, vec!["nike".to_string(), "Kappa".to_string()]);
}
