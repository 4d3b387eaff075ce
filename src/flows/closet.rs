// src/flows/closet.rs
use crate::errors::StyleSeerError;
use crate::flows::analyze::analyze_image;
use crate::flows::event_log::FlowLog;
use crate::models::{AnalysisConfig, AnalysisResult, ClosetAnalysisResult, ItemCount, StyleCount};
use crate::services::VisionAnalyzer;
use futures_util::future::join_all;
use log::info;
use std::collections::{HashMap, HashSet};

pub const TOP_ITEMS: usize = 5;
pub const TOP_STYLES: usize = 5;
pub const TOP_BRANDS: usize = 10;

/// Label counts that remember first-seen order for tie breaking.
#[derive(Default)]
struct Tally {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn add(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(label.to_string(), self.counts.len());
                self.counts.push((label.to_string(), 1));
            }
        }
    }

    /// Highest counts first; `sort_by` is stable so ties keep discovery order.
    fn top(mut self, limit: usize) -> Vec<(String, usize)> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.truncate(limit);
        self.counts
    }
}

/// Folds per-image analyses into the dominant items, styles and brands.
pub fn aggregate(results: &[AnalysisResult]) -> ClosetAnalysisResult {
    let mut items = Tally::default();
    let mut styles = Tally::default();
    let mut brands: Vec<String> = Vec::new();
    let mut seen_brands: HashSet<&str> = HashSet::new();

    for result in results {
        // One count per distinct label per image.
        let mut image_items: HashSet<&str> = HashSet::new();
        for item in &result.clothing_items {
            let item = item.trim();
            if !item.is_empty() && image_items.insert(item) {
                items.add(item);
            }
        }

        let style = result.style.trim();
        if !style.is_empty() {
            styles.add(style);
        }

        for brand in result.brand_mentions() {
            let brand = brand.trim();
            if !brand.is_empty() && seen_brands.insert(brand) {
                brands.push(brand.to_string());
            }
        }
    }

    brands.truncate(TOP_BRANDS);

    ClosetAnalysisResult {
        dominant_clothing_items: items
            .top(TOP_ITEMS)
            .into_iter()
            .map(|(item, count)| ItemCount { item, count })
            .collect(),
        dominant_styles: styles
            .top(TOP_STYLES)
            .into_iter()
            .map(|(style, count)| StyleCount { style, count })
            .collect(),
        recommended_brands: brands,
    }
}

/// Analyzes every photo concurrently and aggregates whatever succeeded.
/// Per-image entries land in `log` in photo order, whatever the completion order.
pub async fn analyze_closet(
    analyzer: &dyn VisionAnalyzer,
    photo_data_uris: &[String],
    config: &AnalysisConfig,
    log: &mut FlowLog,
) -> Result<ClosetAnalysisResult, StyleSeerError> {
    let outcomes = join_all(photo_data_uris.iter().map(|uri| async move {
        let mut image_log = FlowLog::new();
        let result = analyze_image(analyzer, uri, config, &mut image_log).await;
        (result, image_log)
    }))
    .await;

    let mut results: Vec<AnalysisResult> = Vec::with_capacity(outcomes.len());
    for (result, image_log) in outcomes {
        log.append(image_log);
        results.extend(result);
    }
    info!(
        "Closet analysis: {} of {} images analyzed",
        results.len(),
        photo_data_uris.len()
    );

    let closet = aggregate(&results);
    if closet.is_empty() {
        return Err(StyleSeerError::NothingToAnalyze(format!(
            "none of the {} uploaded images produced a usable analysis",
            photo_data_uris.len()
        )));
    }
    Ok(closet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::{FakeAnalyzer, analysis};
    use crate::models::LogEvent;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_aggregates_to_empty() {
        let closet = aggregate(&[]);
        assert!(closet.is_empty());
        assert_eq!(closet, ClosetAnalysisResult::default());
    }

    #[test]
    fn counts_sort_descending_with_stable_ties() {
        let results = vec![
            analysis(&["Jeans", "Tops"], "Casual", &["Kappa"]),
            analysis(&["Shoes", "Tops"], "Sporty", &["PUMA"]),
            analysis(&["Shoes", "Tops", "Hats"], "Casual", &["Kappa", "NIKE"]),
        ];
        let closet = aggregate(&results);

        let items: Vec<_> = closet
            .dominant_clothing_items
            .iter()
            .map(|c| (c.item.as_str(), c.count))
            .collect();
        assert_eq!(items, [("Tops", 3), ("Shoes", 2), ("Jeans", 1), ("Hats", 1)]);

        let styles: Vec<_> = closet
            .dominant_styles
            .iter()
            .map(|c| (c.style.as_str(), c.count))
            .collect();
        assert_eq!(styles, [("Casual", 2), ("Sporty", 1)]);

        assert_eq!(closet.recommended_brands, ["Kappa", "PUMA", "NIKE"]);
    }

    #[test]
    fn duplicate_labels_in_one_image_count_once() {
        let results = vec![analysis(&["Tops", "Tops", "Tops"], "Casual", &[])];
        let closet = aggregate(&results);
        assert_eq!(
            closet.dominant_clothing_items,
            vec![ItemCount { item: "Tops".to_string(), count: 1 }]
        );
    }

    #[test]
    fn lists_are_truncated() {
        let labels = ["A", "B", "C", "D", "E", "F", "G"];
        let brands: Vec<String> = (0..14).map(|i| format!("Brand {i}")).collect();
        let brand_refs: Vec<&str> = brands.iter().map(String::as_str).collect();
        let results: Vec<AnalysisResult> = labels
            .iter()
            .map(|label| analysis(&labels, label, &brand_refs))
            .collect();

        let closet = aggregate(&results);
        assert_eq!(closet.dominant_clothing_items.len(), TOP_ITEMS);
        assert_eq!(closet.dominant_styles.len(), TOP_STYLES);
        assert_eq!(closet.recommended_brands.len(), TOP_BRANDS);
        assert_eq!(closet.recommended_brands[0], "Brand 0");
        assert_eq!(closet.recommended_brands[9], "Brand 9");

        let total: usize = closet.dominant_clothing_items.iter().map(|c| c.count).sum();
        assert!(total <= labels.len() * results.len());
        assert!(
            closet
                .dominant_clothing_items
                .windows(2)
                .all(|w| w[0].count >= w[1].count)
        );
    }

    #[test]
    fn identified_brand_is_collected_last() {
        let mut result = analysis(&["Tops"], "Casual", &["PUMA"]);
        result.identified_brand = Some("NIKE".to_string());
        result.brand_is_explicit = true;
        result.approximated_brands = vec!["Kappa".to_string()];

        let closet = aggregate(&[result]);
        assert_eq!(closet.recommended_brands, ["Kappa", "PUMA", "NIKE"]);
    }

    #[test]
    fn brand_cut_keeps_suggestions_before_identified_brands() {
        let suggestions: Vec<String> = (0..10).map(|i| format!("Brand {i}")).collect();
        let refs: Vec<&str> = suggestions.iter().map(String::as_str).collect();
        let mut result = analysis(&["Tops"], "Casual", &refs);
        result.identified_brand = Some("NIKE".to_string());

        let closet = aggregate(&[result]);
        assert_eq!(closet.recommended_brands.len(), TOP_BRANDS);
        assert!(!closet.recommended_brands.contains(&"NIKE".to_string()));
    }

    #[tokio::test]
    async fn failed_images_are_skipped() {
        let analyzer = FakeAnalyzer::new()
            .with("data:image/png;base64,one", analysis(&["Pants"], "Casual", &["NIKE"]))
            .with("data:image/png;base64,three", analysis(&["Pants", "Tops"], "Formal", &[]));
        let photos = vec![
            "data:image/png;base64,one".to_string(),
            "data:image/png;base64,two".to_string(),
            "data:image/png;base64,three".to_string(),
        ];

        let mut log = FlowLog::new();
        let closet = analyze_closet(&analyzer, &photos, &AnalysisConfig::default(), &mut log)
            .await
            .unwrap();
        assert_eq!(closet.dominant_clothing_items[0], ItemCount { item: "Pants".to_string(), count: 2 });
        assert_eq!(analyzer.calls(), 3);

        let events: Vec<_> = log.into_entries().into_iter().map(|e| e.event).collect();
        assert_eq!(
            events,
            [
                LogEvent::Invoke,
                LogEvent::Response,
                LogEvent::Invoke,
                LogEvent::Error,
                LogEvent::Invoke,
                LogEvent::Response
            ]
        );
    }

    #[tokio::test]
    async fn all_failed_is_nothing_to_analyze() {
        let analyzer = FakeAnalyzer::new();
        let photos = vec!["data:image/png;base64,x".to_string()];
        let mut log = FlowLog::new();
        let err = analyze_closet(&analyzer, &photos, &AnalysisConfig::default(), &mut log)
            .await
            .unwrap_err();
        assert!(matches!(err, StyleSeerError::NothingToAnalyze(_)));
        let entries = log.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].event, LogEvent::Error);

        let mut log = FlowLog::new();
        let err = analyze_closet(&analyzer, &[], &AnalysisConfig::default(), &mut log)
            .await
            .unwrap_err();
        assert!(matches!(err, StyleSeerError::NothingToAnalyze(_)));
        assert!(log.into_entries().is_empty());
    }
}
