// src/flows/analyze.rs
use crate::flows::event_log::{FlowLog, failure};
use crate::models::{AnalysisConfig, AnalysisResult};
use crate::services::VisionAnalyzer;
use crate::services::image_processor::DataUri;
use log::error;
use serde_json::json;

pub const ANALYZE_FLOW: &str = "analyzeClothingImage";

/// Short label for a photo in the event log; the base64 payload itself is never logged.
pub fn describe_photo(photo_data_uri: &str) -> String {
    match DataUri::parse(photo_data_uri) {
        Ok(uri) => format!("{} ({} base64 chars)", uri.mime_type, uri.payload.len()),
        Err(_) => "unrecognized data URI".to_string(),
    }
}

/// Runs one image through the vision model. A failure is logged and means "skip this image".
pub async fn analyze_image(
    analyzer: &dyn VisionAnalyzer,
    photo_data_uri: &str,
    config: &AnalysisConfig,
    log: &mut FlowLog,
) -> Option<AnalysisResult> {
    let photo = describe_photo(photo_data_uri);
    log.invoke(ANALYZE_FLOW, json!({ "photo": photo, "config": config }));

    match analyzer.analyze_clothing(photo_data_uri, config).await {
        Ok(result) => {
            log.response(ANALYZE_FLOW, &result);
            Some(result)
        }
        Err(e) => {
            error!("Error analyzing clothing image {}: {}", photo, e);
            log.error(ANALYZE_FLOW, failure("photo", &photo, &e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::{FakeAnalyzer, analysis};
    use crate::models::LogEvent;

    #[tokio::test]
    async fn success_logs_invoke_and_response() {
        let photo = "data:image/png;base64,AAAA";
        let analyzer = FakeAnalyzer::new().with(photo, analysis(&["Tops"], "Casual", &[]));
        let mut log = FlowLog::new();

        let result = analyze_image(&analyzer, photo, &AnalysisConfig::default(), &mut log).await;
        assert!(result.is_some());

        let entries = log.into_entries();
        let events: Vec<_> = entries.iter().map(|e| e.event).collect();
        assert_eq!(events, [LogEvent::Invoke, LogEvent::Response]);
        assert_eq!(entries[0].data["photo"], "image/png (4 base64 chars)");
        assert_eq!(entries[1].data["style"], "Casual");
    }

    #[tokio::test]
    async fn failure_becomes_none_and_an_error_entry() {
        let mut log = FlowLog::new();
        let result = analyze_image(
            &FakeAnalyzer::new(),
            "data:image/jpeg;base64,BBBB",
            &AnalysisConfig::default(),
            &mut log,
        )
        .await;
        assert!(result.is_none());

        let entries = log.into_entries();
        assert_eq!(entries[1].event, LogEvent::Error);
        assert_eq!(entries[1].data["photo"], "image/jpeg (4 base64 chars)");
        assert!(entries[1].data["error"].as_str().unwrap().contains("unreadable image"));
    }
}
