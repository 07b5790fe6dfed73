use thiserror::Error;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::scan_arena::ScanArena;
use crate::detection::domain::scan_options::ScanOptions;
use crate::shared::constants::SUBSAMPLING_FACTOR;
use crate::shared::face_box::FaceBox;
use crate::shared::gray_image::GrayImage;
use crate::shared::raw_frame::RawFrame;
use crate::shared::snapshot::{DetectionSnapshot, SharedDetection};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid frame dimensions {width}x{height}")]
    InvalidFrame { width: u32, height: u32 },
    #[error("frame buffer holds {actual} bytes, luma plane needs {needed}")]
    ShortBuffer { needed: usize, actual: usize },
}

/// Per-frame detection pipeline: decimate, scan, select the largest face.
///
/// Owns the cached gray search image and the detector's scratch arena; both
/// are reused across frames, and the arena is reset before every scan so no
/// detection state leaks between frames. The result of each frame replaces
/// the published snapshot wholesale.
pub struct DetectionPipeline {
    detector: Box<dyn FaceDetector>,
    options: ScanOptions,
    gray: GrayImage,
    arena: ScanArena,
    shared: SharedDetection,
    frame_index: u64,
}

impl DetectionPipeline {
    pub fn new(detector: Box<dyn FaceDetector>, options: ScanOptions) -> Self {
        Self {
            detector,
            options,
            gray: GrayImage::new(),
            arena: ScanArena::new(),
            shared: SharedDetection::new(),
            frame_index: 0,
        }
    }

    /// Handle render-side readers clone to observe the latest snapshot.
    pub fn shared(&self) -> SharedDetection {
        self.shared.clone()
    }

    pub fn latest(&self) -> DetectionSnapshot {
        self.shared.latest()
    }

    pub fn gray_dimensions(&self) -> (u32, u32) {
        (self.gray.width(), self.gray.height())
    }

    /// Runs one frame through the pipeline and returns the detected face in
    /// search-image coordinates, or `None`.
    ///
    /// A frame the detector chokes on yields `None` and the pipeline keeps
    /// going; only degenerate input is an error, and in that case nothing is
    /// allocated and no snapshot is published.
    pub fn process_frame(&mut self, frame: RawFrame<'_>) -> Result<Option<FaceBox>, PipelineError> {
        let (width, height) = (frame.width(), frame.height());
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidFrame { width, height });
        }
        let needed = (width as usize) * (height as usize);
        if frame.luma().len() < needed {
            return Err(PipelineError::ShortBuffer {
                needed,
                actual: frame.luma().len(),
            });
        }

        let reduced_w = width / SUBSAMPLING_FACTOR;
        let reduced_h = height / SUBSAMPLING_FACTOR;
        if self.gray.ensure_dimensions(reduced_w, reduced_h) {
            log::debug!("search image resized to {reduced_w}x{reduced_h}");
        }
        self.gray.decimate_from(&frame, SUBSAMPLING_FACTOR);

        self.arena.reset();
        let face = match self
            .detector
            .scan(&self.gray, &self.options, &mut self.arena)
        {
            Ok(()) => self
                .arena
                .largest()
                .and_then(|c| c.clamped(reduced_w, reduced_h)),
            Err(e) => {
                log::warn!("detection failed on frame {}: {e}", self.frame_index);
                None
            }
        };

        self.shared.publish(DetectionSnapshot {
            face,
            gray_width: reduced_w,
            gray_height: reduced_h,
            frame_index: self.frame_index,
        });
        self.frame_index += 1;
        Ok(face)
    }
}
