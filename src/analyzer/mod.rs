pub mod analyzer_config;
pub mod element_model;
pub mod extractor;
pub mod field_classifier;
pub mod filter;
pub mod grouper;
pub mod normalizer;
pub mod page_type;
pub mod pipeline;
pub mod purpose;
pub mod rules;
