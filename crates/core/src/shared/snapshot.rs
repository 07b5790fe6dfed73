use std::sync::{Arc, Mutex, PoisonError};

use crate::shared::face_box::FaceBox;

/// Immutable copy of the most recent detection.
///
/// Overwritten whole after every processed frame; readers on the render
/// thread always see a consistent face/dimensions pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetectionSnapshot {
    pub face: Option<FaceBox>,
    pub gray_width: u32,
    pub gray_height: u32,
    pub frame_index: u64,
}

/// Single-writer cell publishing the latest snapshot to render-side readers.
///
/// Cloning the handle shares the cell; readers copy the snapshot out instead
/// of holding the lock across a draw.
#[derive(Clone, Debug, Default)]
pub struct SharedDetection {
    inner: Arc<Mutex<DetectionSnapshot>>,
}

impl SharedDetection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: DetectionSnapshot) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = snapshot;
    }

    pub fn latest(&self) -> DetectionSnapshot {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_returns_published_snapshot() {
        let shared = SharedDetection::new();
        assert_eq!(shared.latest(), DetectionSnapshot::default());

        let snapshot = DetectionSnapshot {
            face: Some(FaceBox {
                x: 1,
                y: 2,
                width: 3,
                height: 4,
            }),
            gray_width: 160,
            gray_height: 120,
            frame_index: 7,
        };
        shared.publish(snapshot.clone());
        assert_eq!(shared.latest(), snapshot);
    }

    #[test]
    fn test_clone_shares_the_cell() {
        let shared = SharedDetection::new();
        let reader = shared.clone();
        shared.publish(DetectionSnapshot {
            face: None,
            gray_width: 80,
            gray_height: 60,
            frame_index: 1,
        });
        assert_eq!(reader.latest().gray_width, 80);
    }
}
