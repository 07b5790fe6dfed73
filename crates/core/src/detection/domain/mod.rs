pub mod face_detector;
pub mod scan_arena;
pub mod scan_options;
