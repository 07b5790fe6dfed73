use thiserror::Error;

use crate::capture::domain::preview_size::PreviewSize;
use crate::shared::raw_frame::RawFrame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("device reports no usable preview size")]
    NoSupportedSize,
    #[error("device rejected preview size {width}x{height}")]
    UnsupportedPreviewSize { width: u32, height: u32 },
    #[error("failed to attach capture to the preview surface: {0}")]
    SurfaceAttach(String),
}

/// What a sink tells the source after each delivered frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkVerdict {
    Continue,
    Stop,
}

/// Receives borrowed frames from a [`FrameSource`].
///
/// The frame is only valid for the duration of the call; the source recycles
/// the underlying buffer as soon as `on_frame` returns.
pub trait FrameSink {
    fn on_frame(&mut self, frame: RawFrame<'_>) -> SinkVerdict;
}

/// Contract for the camera-side collaborator that owns the capture device.
///
/// `start_capture` pumps frames into the sink until the sink stops, the
/// stream ends, or capture is stopped. No frame may be delivered after
/// `release`.
pub trait FrameSource {
    fn open(&mut self) -> Result<(), CaptureError>;

    fn supported_preview_sizes(&self) -> Vec<PreviewSize>;

    fn set_preview_size(&mut self, size: PreviewSize) -> Result<(), CaptureError>;

    fn start_capture(&mut self, sink: &mut dyn FrameSink) -> Result<(), CaptureError>;

    fn stop_capture(&mut self);

    fn release(&mut self);
}
