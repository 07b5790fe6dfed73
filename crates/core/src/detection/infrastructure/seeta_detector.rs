use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
use crate::detection::domain::scan_arena::{FaceCandidate, ScanArena};
use crate::detection::domain::scan_options::{ScanOptions, SearchPolicy};
use crate::shared::gray_image::GrayImage;

/// Smallest face the engine will look for, in search-image pixels.
/// This is also the engine's hard floor.
const MIN_FACE_SIZE: u32 = 20;

/// Sliding-window stride under the rough policy.
const ROUGH_WINDOW_STEP: u32 = 4;

/// Sliding-window stride under exhaustive search.
const FINE_WINDOW_STEP: u32 = 2;

#[derive(Error, Debug)]
pub enum ClassifierLoadError {
    #[error("cascade model not found at {path}")]
    NotFound { path: PathBuf },
    #[error("failed to load cascade model from {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
}

/// Cascade face detector backed by the `rustface` funnel-structured engine.
///
/// The model is an opaque pre-trained artifact loaded once at construction
/// and never mutated. Construction fails fast when the artifact is missing
/// or unreadable; a half-built detector never reaches the pipeline.
pub struct SeetaDetector {
    inner: Box<dyn rustface::Detector>,
}

// Safety: the detector is driven from exactly one thread at a time; the
// engine keeps no state shared outside itself.
unsafe impl Send for SeetaDetector {}

impl SeetaDetector {
    pub fn new(model_path: &Path) -> Result<Self, ClassifierLoadError> {
        if !model_path.exists() {
            return Err(ClassifierLoadError::NotFound {
                path: model_path.to_path_buf(),
            });
        }
        let path_str = model_path
            .to_str()
            .ok_or_else(|| ClassifierLoadError::Unreadable {
                path: model_path.to_path_buf(),
                reason: "path is not valid UTF-8".into(),
            })?;
        let inner =
            rustface::create_detector(path_str).map_err(|e| ClassifierLoadError::Unreadable {
                path: model_path.to_path_buf(),
                reason: e.to_string(),
            })?;
        log::info!("cascade model loaded from {}", model_path.display());
        Ok(Self { inner })
    }

    fn apply_options(&mut self, options: &ScanOptions) {
        self.inner
            .set_pyramid_scale_factor(pyramid_factor(options.scale_factor));
        // Neighbor confirmation maps onto the cascade score threshold: each
        // unit of score is one confirming stage beyond the baseline.
        self.inner
            .set_score_thresh(f64::from(options.min_neighbors.max(1)));
        self.inner.set_min_face_size(MIN_FACE_SIZE);
        let step = match options.policy {
            SearchPolicy::BiggestRough => ROUGH_WINDOW_STEP,
            SearchPolicy::Exhaustive => FINE_WINDOW_STEP,
        };
        self.inner.set_slide_window_step(step, step);
    }
}

/// The engine expresses the per-pass window shrink as a pyramid downscale
/// multiplier below 1.0. Out-of-range scale factors (at or below 1.0) clamp
/// to the smallest supported shrink instead of being rejected.
fn pyramid_factor(scale_factor: f32) -> f32 {
    (1.0 / scale_factor).clamp(0.1, 0.99)
}

impl FaceDetector for SeetaDetector {
    fn scan(
        &mut self,
        image: &GrayImage,
        options: &ScanOptions,
        arena: &mut ScanArena,
    ) -> Result<(), DetectionError> {
        if image.width() == 0 || image.height() == 0 {
            // The engine rejects empty images; there is nothing to find anyway.
            return Ok(());
        }
        self.apply_options(options);

        let mut data = rustface::ImageData::new(image.data(), image.width(), image.height());
        for face in self.inner.detect(&mut data) {
            let bbox = face.bbox();
            arena.push(FaceCandidate {
                x: bbox.x(),
                y: bbox.y(),
                width: bbox.width(),
                height: bbox.height(),
                score: face.score(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use approx::assert_relative_eq;
    use tempfile::TempDir;

    use crate::detection::infrastructure::model_resolver;
    use crate::shared::constants::CASCADE_MODEL_NAME;
    use crate::shared::raw_frame::RawFrame;

    /// A locally installed cascade model, if provisioning has already run on
    /// this machine. Engine-level tests skip without one rather than hitting
    /// the network.
    fn installed_model() -> Option<PathBuf> {
        let cached = model_resolver::model_cache_dir()
            .ok()?
            .join(CASCADE_MODEL_NAME);
        cached.is_file().then_some(cached)
    }

    fn textured_gray(width: u32, height: u32) -> GrayImage {
        let luma: Vec<u8> = (0..height)
            .flat_map(|y| (0..width).map(move |x| ((x * 7 + y * 13) % 256) as u8))
            .collect();
        let mut gray = GrayImage::new();
        gray.ensure_dimensions(width, height);
        gray.decimate_from(&RawFrame::new(&luma, width, height), 1);
        gray
    }

    #[test]
    fn test_missing_model_fails_construction() {
        let result = SeetaDetector::new(Path::new("/nonexistent/cascade.bin"));
        assert!(matches!(
            result,
            Err(ClassifierLoadError::NotFound { .. })
        ));
    }

    #[test]
    fn test_truncated_model_fails_construction() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cascade.bin");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0x01, 0x02, 0x03]).unwrap();
        drop(file);

        let result = SeetaDetector::new(&path);
        assert!(matches!(
            result,
            Err(ClassifierLoadError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_pyramid_factor_is_reciprocal_of_scale() {
        assert_relative_eq!(pyramid_factor(1.1), 1.0 / 1.1, epsilon = 1e-6);
        assert_relative_eq!(pyramid_factor(2.0), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_pyramid_factor_clamps_degenerate_scales() {
        // Scale factors at or below 1.0 would stop the pyramid shrinking.
        assert_relative_eq!(pyramid_factor(1.0), 0.99, epsilon = 1e-6);
        assert_relative_eq!(pyramid_factor(0.5), 0.99, epsilon = 1e-6);
        // Absurdly large factors bottom out instead of skipping every scale.
        assert_relative_eq!(pyramid_factor(100.0), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_repeated_scan_of_same_image_is_identical() {
        // Skip when no cascade model is installed locally.
        let Some(model_path) = installed_model() else {
            return;
        };
        let mut detector = SeetaDetector::new(&model_path).unwrap();
        let gray = textured_gray(160, 120);
        let options = ScanOptions::default();

        let mut first = ScanArena::new();
        detector.scan(&gray, &options, &mut first).unwrap();
        let mut second = ScanArena::new();
        detector.scan(&gray, &options, &mut second).unwrap();

        assert_eq!(first.candidates(), second.candidates());
    }
}
