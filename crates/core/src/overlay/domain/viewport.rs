use crate::shared::face_box::FaceBox;

/// Rectangle in display coordinates, ready for a stroked draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl ViewportRect {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// Projects a face box from search-image space into viewport space:
/// each axis is scaled independently by viewport / gray.
pub fn project(
    face: &FaceBox,
    gray_width: u32,
    gray_height: u32,
    viewport_width: u32,
    viewport_height: u32,
) -> ViewportRect {
    debug_assert!(gray_width > 0 && gray_height > 0);
    let scale_x = viewport_width as f32 / gray_width as f32;
    let scale_y = viewport_height as f32 / gray_height as f32;
    ViewportRect {
        x0: face.x as f32 * scale_x,
        y0: face.y as f32 * scale_y,
        x1: face.right() as f32 * scale_x,
        y1: face.bottom() as f32 * scale_y,
    }
}
