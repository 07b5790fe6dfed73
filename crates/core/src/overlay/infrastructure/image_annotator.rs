use image::{Rgb, RgbImage};

use crate::overlay::domain::overlay_renderer::{OverlayRenderer, OverlayScene};
use crate::overlay::domain::viewport::ViewportRect;
use crate::shared::constants::OVERLAY_STROKE_WIDTH;

const STROKE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Draws the overlay onto an RGB canvas, for preview surfaces that are plain
/// images rather than GPU layers.
///
/// Only the stroked rectangle is rasterized here; label glyphs belong to the
/// host surface's text stack, which gets the measured label via the scene.
pub struct ImageAnnotator {
    canvas: RgbImage,
    stroke: u32,
}

impl ImageAnnotator {
    pub fn new(canvas: RgbImage) -> Self {
        Self {
            canvas,
            stroke: OVERLAY_STROKE_WIDTH,
        }
    }

    pub fn into_canvas(self) -> RgbImage {
        self.canvas
    }

    fn draw_stroked_rect(&mut self, rect: &ViewportRect) {
        let w = self.canvas.width() as i64;
        let h = self.canvas.height() as i64;
        let x0 = (rect.x0.round() as i64).clamp(0, w);
        let y0 = (rect.y0.round() as i64).clamp(0, h);
        let x1 = (rect.x1.round() as i64).clamp(0, w);
        let y1 = (rect.y1.round() as i64).clamp(0, h);
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        let stroke = i64::from(self.stroke);
        for y in y0..y1 {
            for x in x0..x1 {
                let on_horizontal_band = y < y0 + stroke || y >= y1 - stroke;
                let on_vertical_band = x < x0 + stroke || x >= x1 - stroke;
                if on_horizontal_band || on_vertical_band {
                    self.canvas.put_pixel(x as u32, y as u32, STROKE_COLOR);
                }
            }
        }
    }
}

impl OverlayRenderer for ImageAnnotator {
    fn render(&mut self, scene: &OverlayScene) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(rect) = scene.rect {
            self.draw_stroked_rect(&rect);
        }
        Ok(())
    }
}
