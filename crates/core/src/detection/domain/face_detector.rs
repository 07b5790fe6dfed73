use thiserror::Error;

use crate::detection::domain::scan_arena::ScanArena;
use crate::detection::domain::scan_options::ScanOptions;
use crate::shared::gray_image::GrayImage;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("detection engine rejected the search image: {0}")]
    Engine(String),
}

/// Domain interface for cascade face detection.
///
/// Implementations fill the arena with confirmed candidates for one search
/// image; selection among them is the caller's business. Engines may keep
/// internal state, hence `&mut self`.
pub trait FaceDetector: Send {
    fn scan(
        &mut self,
        image: &GrayImage,
        options: &ScanOptions,
        arena: &mut ScanArena,
    ) -> Result<(), DetectionError>;
}
