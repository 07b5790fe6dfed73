pub mod model_resolver;
pub mod seeta_detector;
