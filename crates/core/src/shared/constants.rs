/// Integer decimation factor applied to both axes when building the
/// grayscale search image.
pub const SUBSAMPLING_FACTOR: u32 = 4;

/// Per-pass shrink of the cascade search window.
pub const CASCADE_SCALE_FACTOR: f32 = 1.1;

/// Overlapping raw detections required to confirm a candidate.
pub const MIN_NEIGHBORS: u32 = 3;

/// Allowed aspect-ratio deviation when negotiating a preview size.
pub const ASPECT_TOLERANCE: f64 = 0.05;

pub const CASCADE_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";
pub const CASCADE_MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

/// Stroke width of the overlay rectangle, in viewport pixels.
pub const OVERLAY_STROKE_WIDTH: u32 = 2;

/// Status line preview surfaces draw across the top of the viewport.
pub const STATUS_LABEL: &str = "FacePreview - This side up.";

/// Text size the status label is measured against.
pub const STATUS_LABEL_TEXT_SIZE: f32 = 20.0;
