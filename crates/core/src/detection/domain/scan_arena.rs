use crate::shared::face_box::FaceBox;

/// A confirmed detector hit, before policy selection.
///
/// Coordinates are in search-image space and may poke past the image edge;
/// [`FaceCandidate::clamped`] trims to bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceCandidate {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub score: f64,
}

impl FaceCandidate {
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Intersects the candidate with the search-image bounds. Returns `None`
    /// when nothing of it lies inside.
    pub fn clamped(&self, gray_width: u32, gray_height: u32) -> Option<FaceBox> {
        let x0 = self.x.clamp(0, gray_width as i32);
        let y0 = self.y.clamp(0, gray_height as i32);
        let x1 = self
            .x
            .saturating_add(self.width as i32)
            .clamp(0, gray_width as i32);
        let y1 = self
            .y
            .saturating_add(self.height as i32)
            .clamp(0, gray_height as i32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(FaceBox {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}

/// Reusable scratch storage the detector writes candidates into.
///
/// The pipeline resets it before every scan; capacity survives the reset so
/// steady-state detection does not allocate. No candidate outlives the frame
/// it was found in.
#[derive(Debug, Default)]
pub struct ScanArena {
    candidates: Vec<FaceCandidate>,
}

impl ScanArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.candidates.clear();
    }

    pub fn push(&mut self, candidate: FaceCandidate) {
        self.candidates.push(candidate);
    }

    pub fn candidates(&self) -> &[FaceCandidate] {
        &self.candidates
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// The largest candidate by area; the first maximal one wins ties.
    pub fn largest(&self) -> Option<&FaceCandidate> {
        let mut best: Option<&FaceCandidate> = None;
        for candidate in &self.candidates {
            if best.map_or(true, |b| candidate.area() > b.area()) {
                best = Some(candidate);
            }
        }
        best
    }
}
