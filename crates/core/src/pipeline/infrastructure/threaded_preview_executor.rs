use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::capture::domain::capture_session::CaptureSession;
use crate::capture::domain::frame_source::{FrameSink, FrameSource, SinkVerdict};
use crate::pipeline::detection_pipeline::DetectionPipeline;
use crate::shared::raw_frame::RawFrame;

/// At most one frame in flight; anything arriving mid-detection is dropped.
const FRAME_CHANNEL_CAPACITY: usize = 1;

/// Counters for one executor run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreviewStats {
    /// Frames handed to the detection thread.
    pub frames_delivered: u64,
    /// Frames dropped because detection was still busy.
    pub frames_dropped: u64,
    /// Frames the pipeline actually processed.
    pub frames_processed: u64,
}

/// An owned copy of one capture frame, travelling to the detection thread.
struct PooledFrame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

/// Runs capture and detection on separate threads with drop-if-busy handoff.
///
/// The capture thread copies each delivered luma plane into a pooled buffer
/// and `try_send`s it over a bounded channel; when detection is still busy
/// the frame is dropped and its buffer recycled immediately, so capture is
/// never stalled by the detector. Processed buffers flow back to the pool
/// over a second channel.
pub struct ThreadedPreviewExecutor;

impl ThreadedPreviewExecutor {
    pub fn new() -> Self {
        Self
    }

    pub fn run<S: FrameSource>(
        &self,
        session: &mut CaptureSession<S>,
        pipeline: &mut DetectionPipeline,
    ) -> Result<PreviewStats, Box<dyn std::error::Error>> {
        let (frame_tx, frame_rx) = crossbeam_channel::bounded::<PooledFrame>(FRAME_CHANNEL_CAPACITY);
        let (recycle_tx, recycle_rx) = crossbeam_channel::unbounded::<Vec<u8>>();

        let pipeline_ref = &mut *pipeline;
        std::thread::scope(|scope| {
            let detect_handle = scope.spawn(move || {
                let mut processed: u64 = 0;
                for pooled in frame_rx {
                    let frame = RawFrame::new(&pooled.data, pooled.width, pooled.height);
                    match pipeline_ref.process_frame(frame) {
                        Ok(_) => processed += 1,
                        Err(e) => log::warn!("skipping frame: {e}"),
                    }
                    // Buffer goes back to the capture side regardless of the
                    // frame's fate; the pool must never drain.
                    let _ = recycle_tx.send(pooled.data);
                }
                processed
            });

            let mut sink = DropIfBusySink::new(frame_tx, recycle_rx);
            let capture_result = session.run(&mut sink);
            let (frames_delivered, frames_dropped) = (sink.delivered, sink.dropped);
            // Dropping the sink closes the frame channel, letting the
            // detection thread drain and exit.
            drop(sink);

            let frames_processed = detect_handle
                .join()
                .map_err(|_| "detection thread panicked")?;
            capture_result?;

            if frames_dropped > 0 {
                log::debug!("dropped {frames_dropped} frames while detection was busy");
            }
            Ok(PreviewStats {
                frames_delivered,
                frames_dropped,
                frames_processed,
            })
        })
    }
}

impl Default for ThreadedPreviewExecutor {
    fn default() -> Self {
        Self::new()
    }
}

struct DropIfBusySink {
    frame_tx: Sender<PooledFrame>,
    recycle_rx: Receiver<Vec<u8>>,
    pool: Vec<Vec<u8>>,
    delivered: u64,
    dropped: u64,
}

impl DropIfBusySink {
    fn new(frame_tx: Sender<PooledFrame>, recycle_rx: Receiver<Vec<u8>>) -> Self {
        Self {
            frame_tx,
            recycle_rx,
            pool: Vec::new(),
            delivered: 0,
            dropped: 0,
        }
    }
}

impl FrameSink for DropIfBusySink {
    fn on_frame(&mut self, frame: RawFrame<'_>) -> SinkVerdict {
        while let Ok(buffer) = self.recycle_rx.try_recv() {
            self.pool.push(buffer);
        }
        let mut data = self.pool.pop().unwrap_or_default();
        data.clear();
        data.extend_from_slice(frame.luma());

        match self.frame_tx.try_send(PooledFrame {
            data,
            width: frame.width(),
            height: frame.height(),
        }) {
            Ok(()) => self.delivered += 1,
            Err(TrySendError::Full(rejected)) => {
                self.pool.push(rejected.data);
                self.dropped += 1;
            }
            Err(TrySendError::Disconnected(_)) => return SinkVerdict::Stop,
        }
        SinkVerdict::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::infrastructure::synthetic_camera::SyntheticCamera;
    use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
    use crate::detection::domain::scan_arena::{FaceCandidate, ScanArena};
    use crate::detection::domain::scan_options::ScanOptions;
    use crate::shared::face_box::FaceBox;
    use crate::shared::gray_image::GrayImage;

    struct FakeDetector {
        candidate: Option<FaceCandidate>,
    }

    impl FaceDetector for FakeDetector {
        fn scan(
            &mut self,
            _image: &GrayImage,
            _options: &ScanOptions,
            arena: &mut ScanArena,
        ) -> Result<(), DetectionError> {
            if let Some(c) = self.candidate {
                arena.push(c);
            }
            Ok(())
        }
    }

    fn run_with(frames: usize, candidate: Option<FaceCandidate>) -> (PreviewStats, DetectionPipeline) {
        let camera = SyntheticCamera::new(vec![0u8; 64 * 48], 64, 48, frames);
        let mut session = CaptureSession::open(camera, 64, 48).unwrap();
        let mut pipeline =
            DetectionPipeline::new(Box::new(FakeDetector { candidate }), ScanOptions::default());
        let stats = ThreadedPreviewExecutor::new()
            .run(&mut session, &mut pipeline)
            .unwrap();
        (stats, pipeline)
    }

    #[test]
    fn test_every_delivered_frame_is_processed() {
        let (stats, _) = run_with(8, None);
        assert_eq!(stats.frames_delivered + stats.frames_dropped, 8);
        assert_eq!(stats.frames_processed, stats.frames_delivered);
        assert!(stats.frames_delivered >= 1);
    }

    #[test]
    fn test_final_snapshot_reflects_detection() {
        let candidate = FaceCandidate {
            x: 2,
            y: 2,
            width: 8,
            height: 8,
            score: 3.0,
        };
        let (stats, pipeline) = run_with(5, Some(candidate));
        assert!(stats.frames_processed >= 1);
        let snapshot = pipeline.latest();
        assert_eq!(snapshot.gray_width, 16);
        assert_eq!(snapshot.gray_height, 12);
        assert_eq!(
            snapshot.face,
            Some(FaceBox {
                x: 2,
                y: 2,
                width: 8,
                height: 8
            })
        );
    }

    #[test]
    fn test_render_side_reader_sees_published_snapshot() {
        let candidate = FaceCandidate {
            x: 1,
            y: 1,
            width: 4,
            height: 4,
            score: 3.0,
        };
        let camera = SyntheticCamera::new(vec![0u8; 64 * 48], 64, 48, 3);
        let mut session = CaptureSession::open(camera, 64, 48).unwrap();
        let mut pipeline = DetectionPipeline::new(
            Box::new(FakeDetector {
                candidate: Some(candidate),
            }),
            ScanOptions::default(),
        );
        let reader = pipeline.shared();
        ThreadedPreviewExecutor::new()
            .run(&mut session, &mut pipeline)
            .unwrap();
        assert!(reader.latest().face.is_some());
    }
}
