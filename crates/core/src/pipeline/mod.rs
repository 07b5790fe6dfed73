pub mod detection_pipeline;
pub mod infrastructure;
