pub mod client;
pub mod gateway;
pub mod key_points;

pub use client::{inference_request_body, HuggingFaceClient, SummaryModel};
pub use gateway::{SummarizeGateway, SummaryOutcome};
pub use key_points::{extract_key_points, split_sentences, MAX_KEY_POINTS, MIN_KEY_POINT_CHARS};
