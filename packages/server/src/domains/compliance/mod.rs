//! EU AI Act compliance scoring of scraped site content.

pub mod analyzer;
pub mod prompt;

pub use analyzer::{parse_llm_json, ComplianceAnalyzer};
pub use prompt::EU_AI_ACT_PROMPT;
