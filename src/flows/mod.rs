// src/flows/mod.rs
pub mod analyze;
pub mod closet;
pub mod complementary;
pub mod event_log;
pub mod recommend;

pub use analyze::analyze_image;
pub use closet::{aggregate, analyze_closet};
pub use complementary::{ComplementaryItems, ComplementaryRequest, find_complementary};
pub use event_log::FlowLog;
pub use recommend::{RecommendationRequest, Recommendations, recommend};
