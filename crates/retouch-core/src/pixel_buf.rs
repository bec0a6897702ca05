use anyhow::ensure;

/// Channel order and alpha presence of a [`PixelBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// Interleaved R, G, B.
    Rgb8,
    /// Interleaved R, G, B, A (straight alpha).
    Rgba8,
}

impl ChannelLayout {
    pub fn channels(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba8)
    }
}

/// 8-bit raster image.
///
/// Pixel data is interleaved and row-major with no padding between rows:
/// `data[(y * width + x) * channels + c]`. The pipeline never mutates a
/// buffer it was handed; each stage consumes one buffer and returns another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub layout: ChannelLayout,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn from_raw(
        width: u32,
        height: u32,
        layout: ChannelLayout,
        data: Vec<u8>,
    ) -> anyhow::Result<Self> {
        let expected = width as usize * height as usize * layout.channels();
        ensure!(
            data.len() == expected,
            "expected {expected} bytes for {width}x{height} {layout:?}, got {}",
            data.len()
        );
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// RGB buffer with every pixel set to `rgb`.
    pub fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * 3);
        for _ in 0..pixel_count {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            layout: ChannelLayout::Rgb8,
            data,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Channel values of the pixel at (x, y).
    ///
    /// Panics if the coordinate is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        let channels = self.channels();
        let idx = (y as usize * self.width as usize + x as usize) * channels;
        &self.data[idx..idx + channels]
    }

    /// Drop the alpha channel, if any. RGB input is returned unchanged.
    pub fn strip_alpha(self) -> Self {
        match self.layout {
            ChannelLayout::Rgb8 => self,
            ChannelLayout::Rgba8 => self.to_working(),
        }
    }

    /// Copy of this buffer in the pipeline's working representation (RGB, no alpha).
    /// The pixel data is copied exactly once.
    pub fn to_working(&self) -> Self {
        match self.layout {
            ChannelLayout::Rgb8 => self.clone(),
            ChannelLayout::Rgba8 => {
                let mut data = Vec::with_capacity(self.pixel_count() * 3);
                for px in self.data.chunks_exact(4) {
                    data.extend_from_slice(&px[..3]);
                }
                Self {
                    width: self.width,
                    height: self.height,
                    layout: ChannelLayout::Rgb8,
                    data,
                }
            }
        }
    }
}
