/// A borrowed camera frame: the luma plane of a YUV capture buffer.
///
/// Valid only for the duration of one sink callback. The source recycles the
/// underlying buffer as soon as the callback returns, so nothing downstream
/// may hold on to the slice.
#[derive(Clone, Copy, Debug)]
pub struct RawFrame<'a> {
    luma: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> RawFrame<'a> {
    /// Wraps a luma plane. Capture buffers for semi-planar formats carry
    /// chroma after the luma plane, so the slice may be longer than
    /// `width * height`; it must never be shorter.
    pub fn new(luma: &'a [u8], width: u32, height: u32) -> Self {
        debug_assert!(
            luma.len() >= (width as usize) * (height as usize),
            "luma plane shorter than width * height"
        );
        Self {
            luma,
            width,
            height,
        }
    }

    pub fn luma(&self) -> &'a [u8] {
        self.luma
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
