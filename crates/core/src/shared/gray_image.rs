use ndarray::ArrayView2;

use crate::shared::raw_frame::RawFrame;

/// The reduced-resolution grayscale search image the detector scans.
///
/// Owned exclusively by the pipeline and reallocated only when the requested
/// dimensions change, so steady-state frames reuse one buffer.
#[derive(Clone, Debug, Default)]
pub struct GrayImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl GrayImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resizes the buffer if the dimensions differ from the cached ones.
    /// Returns `true` when a reallocation happened.
    pub fn ensure_dimensions(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.data = vec![0; (width as usize) * (height as usize)];
        true
    }

    /// Nearest-neighbor decimation: byte (x, y) becomes the raw luma byte at
    /// (factor * x, factor * y). No interpolation, no gamma correction, so
    /// re-decimating the same frame always yields the same bytes.
    pub fn decimate_from(&mut self, frame: &RawFrame<'_>, factor: u32) {
        debug_assert_eq!(self.width, frame.width() / factor);
        debug_assert_eq!(self.height, frame.height() / factor);

        let f = factor as usize;
        let src_stride = frame.width() as usize;
        let w = self.width as usize;
        let luma = frame.luma();
        for y in 0..self.height as usize {
            let src_row = &luma[y * f * src_stride..];
            let dst_row = &mut self.data[y * w..(y + 1) * w];
            for (x, out) in dst_row.iter_mut().enumerate() {
                *out = src_row[x * f];
            }
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn byte_at(&self, x: u32, y: u32) -> u8 {
        self.data[(y * self.width + x) as usize]
    }

    pub fn as_ndarray(&self) -> ArrayView2<'_, u8> {
        ArrayView2::from_shape((self.height as usize, self.width as usize), &self.data)
            .expect("gray image data length must match dimensions")
    }
}
