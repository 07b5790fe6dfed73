use crate::capture::domain::frame_source::{CaptureError, FrameSink, FrameSource};
use crate::capture::domain::preview_size::{select_preview_size, PreviewSize};

/// Scoped ownership of a capture device.
///
/// `open` acquires the device and negotiates the preview size against the
/// target viewport; dropping the session stops capture and releases the
/// device. Frames can therefore only be delivered while the session is
/// alive, which pairs acquisition with the display-surface lifecycle.
pub struct CaptureSession<S: FrameSource> {
    source: S,
    size: PreviewSize,
}

impl<S: FrameSource> CaptureSession<S> {
    pub fn open(
        mut source: S,
        target_width: u32,
        target_height: u32,
    ) -> Result<Self, CaptureError> {
        source.open()?;

        let sizes = source.supported_preview_sizes();
        let size = match select_preview_size(&sizes, target_width, target_height) {
            Some(size) => size,
            None => {
                source.release();
                return Err(CaptureError::NoSupportedSize);
            }
        };
        if let Err(e) = source.set_preview_size(size) {
            source.release();
            return Err(e);
        }

        log::info!(
            "capture session opened, preview {}x{} for viewport {}x{}",
            size.width,
            size.height,
            target_width,
            target_height
        );
        Ok(Self { source, size })
    }

    pub fn preview_size(&self) -> PreviewSize {
        self.size
    }

    /// Pumps frames into the sink until the sink stops or the stream ends.
    pub fn run(&mut self, sink: &mut dyn FrameSink) -> Result<(), CaptureError> {
        self.source.start_capture(sink)
    }
}

impl<S: FrameSource> Drop for CaptureSession<S> {
    fn drop(&mut self) {
        self.source.stop_capture();
        self.source.release();
        log::info!("capture device released");
    }
}
