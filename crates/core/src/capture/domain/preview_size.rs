use crate::shared::constants::ASPECT_TOLERANCE;

/// A capture resolution the device claims to support.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewSize {
    pub width: u32,
    pub height: u32,
}

impl PreviewSize {
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Picks the supported size whose aspect ratio matches the target within
/// tolerance, preferring the closest height; when no size matches the
/// ratio, falls back to closest height over the full set. The first minimal
/// candidate in iteration order wins ties.
pub fn select_preview_size(
    sizes: &[PreviewSize],
    target_width: u32,
    target_height: u32,
) -> Option<PreviewSize> {
    let target_ratio = f64::from(target_width) / f64::from(target_height);
    let target_height = f64::from(target_height);

    let mut best: Option<PreviewSize> = None;
    let mut min_diff = f64::MAX;

    for size in sizes {
        if (size.aspect_ratio() - target_ratio).abs() > ASPECT_TOLERANCE {
            continue;
        }
        let diff = (f64::from(size.height) - target_height).abs();
        if diff < min_diff {
            best = Some(*size);
            min_diff = diff;
        }
    }

    // Nothing matched the aspect ratio; ignore that requirement.
    if best.is_none() {
        min_diff = f64::MAX;
        for size in sizes {
            let diff = (f64::from(size.height) - target_height).abs();
            if diff < min_diff {
                best = Some(*size);
                min_diff = diff;
            }
        }
    }

    best
}
