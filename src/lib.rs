pub mod label_pipeline;
pub mod logger;
