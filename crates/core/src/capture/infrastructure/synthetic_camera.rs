use crate::capture::domain::frame_source::{CaptureError, FrameSink, FrameSource, SinkVerdict};
use crate::capture::domain::preview_size::PreviewSize;

/// Deterministic stand-in for camera hardware.
///
/// Replays a fixed luma plane (typically decoded from a still image) for a
/// configured number of frames, reusing a single capture buffer between
/// deliveries the way a real driver recycles preview buffers.
pub struct SyntheticCamera {
    luma: Vec<u8>,
    width: u32,
    height: u32,
    frames: usize,
    buffer: Vec<u8>,
    open: bool,
    stopped: bool,
}

impl SyntheticCamera {
    pub fn new(luma: Vec<u8>, width: u32, height: u32, frames: usize) -> Self {
        debug_assert_eq!(
            luma.len(),
            (width as usize) * (height as usize),
            "luma length must equal width * height"
        );
        Self {
            luma,
            width,
            height,
            frames,
            buffer: Vec::new(),
            open: false,
            stopped: false,
        }
    }

    fn native_size(&self) -> PreviewSize {
        PreviewSize {
            width: self.width,
            height: self.height,
        }
    }
}

impl FrameSource for SyntheticCamera {
    fn open(&mut self) -> Result<(), CaptureError> {
        self.open = true;
        self.stopped = false;
        Ok(())
    }

    fn supported_preview_sizes(&self) -> Vec<PreviewSize> {
        vec![self.native_size()]
    }

    fn set_preview_size(&mut self, size: PreviewSize) -> Result<(), CaptureError> {
        if size != self.native_size() {
            return Err(CaptureError::UnsupportedPreviewSize {
                width: size.width,
                height: size.height,
            });
        }
        Ok(())
    }

    fn start_capture(&mut self, sink: &mut dyn FrameSink) -> Result<(), CaptureError> {
        if !self.open {
            return Err(CaptureError::DeviceUnavailable(
                "device not open".into(),
            ));
        }
        for _ in 0..self.frames {
            if self.stopped {
                break;
            }
            // Simulated DMA write into the one recycled capture buffer.
            self.buffer.clear();
            self.buffer.extend_from_slice(&self.luma);
            let frame =
                crate::shared::raw_frame::RawFrame::new(&self.buffer, self.width, self.height);
            if sink.on_frame(frame) == SinkVerdict::Stop {
                break;
            }
        }
        Ok(())
    }

    fn stop_capture(&mut self) {
        self.stopped = true;
    }

    fn release(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::raw_frame::RawFrame;

    struct RecordingSink {
        frames: usize,
        dims: Vec<(u32, u32)>,
        buffer_ptrs: Vec<usize>,
        stop_after: Option<usize>,
    }

    impl RecordingSink {
        fn new(stop_after: Option<usize>) -> Self {
            Self {
                frames: 0,
                dims: Vec::new(),
                buffer_ptrs: Vec::new(),
                stop_after,
            }
        }
    }

    impl FrameSink for RecordingSink {
        fn on_frame(&mut self, frame: RawFrame<'_>) -> SinkVerdict {
            self.frames += 1;
            self.dims.push((frame.width(), frame.height()));
            self.buffer_ptrs.push(frame.luma().as_ptr() as usize);
            match self.stop_after {
                Some(n) if self.frames >= n => SinkVerdict::Stop,
                _ => SinkVerdict::Continue,
            }
        }
    }

    fn camera(frames: usize) -> SyntheticCamera {
        SyntheticCamera::new(vec![128u8; 64 * 48], 64, 48, frames)
    }

    #[test]
    fn test_delivers_configured_frame_count() {
        let mut cam = camera(5);
        cam.open().unwrap();
        let mut sink = RecordingSink::new(None);
        cam.start_capture(&mut sink).unwrap();
        assert_eq!(sink.frames, 5);
        assert!(sink.dims.iter().all(|&d| d == (64, 48)));
    }

    #[test]
    fn test_capture_buffer_is_reused() {
        let mut cam = camera(4);
        cam.open().unwrap();
        let mut sink = RecordingSink::new(None);
        cam.start_capture(&mut sink).unwrap();
        let first = sink.buffer_ptrs[0];
        assert!(sink.buffer_ptrs.iter().all(|&p| p == first));
    }

    #[test]
    fn test_sink_stop_ends_capture_early() {
        let mut cam = camera(10);
        cam.open().unwrap();
        let mut sink = RecordingSink::new(Some(3));
        cam.start_capture(&mut sink).unwrap();
        assert_eq!(sink.frames, 3);
    }

    #[test]
    fn test_capture_before_open_fails() {
        let mut cam = camera(1);
        let mut sink = RecordingSink::new(None);
        assert!(matches!(
            cam.start_capture(&mut sink),
            Err(CaptureError::DeviceUnavailable(_))
        ));
    }

    #[test]
    fn test_rejects_foreign_preview_size() {
        let mut cam = camera(1);
        cam.open().unwrap();
        let result = cam.set_preview_size(PreviewSize {
            width: 320,
            height: 240,
        });
        assert!(matches!(
            result,
            Err(CaptureError::UnsupportedPreviewSize { .. })
        ));
    }
}
