//! Drawable surfaces backing `<canvas>` elements.
//!
//! A surface is an RGBA8 pixel buffer that is only allocated once a 2D
//! context is acquired. Resizing always discards the buffer, the same way
//! assigning `width` or `height` on a canvas clears it.

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_CANVAS_WIDTH: u32 = 300;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 150;

/// Size caps beyond which a 2D context cannot be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasLimits {
    /// Largest allowed width or height, in pixels.
    pub max_dimension: u32,
    /// Largest allowed width * height.
    pub max_area: u64,
}

impl Default for CanvasLimits {
    fn default() -> Self {
        Self {
            max_dimension: 32_767,
            max_area: 268_435_456,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanvasError {
    #[error("2d context unavailable for a {width}x{height} canvas")]
    ContextUnavailable { width: u32, height: u32 },
    #[error("cannot draw from a {width}x{height} canvas")]
    ZeroSizedSource { width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanvasSurface {
    width: u32,
    height: u32,
    #[serde(skip)]
    pixels: Vec<u8>,
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

impl CanvasSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize the surface and clear its contents.
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = Vec::new();
    }

    pub fn is_allocated(&self) -> bool {
        !self.pixels.is_empty()
    }

    /// RGBA of a single pixel. Unallocated surfaces read as transparent black.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        if !self.is_allocated() {
            return Some([0; 4]);
        }
        let offset = self.offset(x, y);
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + 4]);
        Some(rgba)
    }

    /// Full RGBA buffer, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        if self.is_allocated() {
            self.pixels.clone()
        } else {
            vec![0; self.width as usize * self.height as usize * 4]
        }
    }

    pub fn context_2d(&mut self, limits: &CanvasLimits) -> Result<Context2d<'_>, CanvasError> {
        let unavailable = CanvasError::ContextUnavailable {
            width: self.width,
            height: self.height,
        };
        let area = u64::from(self.width) * u64::from(self.height);
        if self.width > limits.max_dimension
            || self.height > limits.max_dimension
            || area > limits.max_area
        {
            return Err(unavailable);
        }
        let len = usize::try_from(area)
            .ok()
            .and_then(|area| area.checked_mul(4))
            .ok_or(unavailable)?;
        if self.pixels.len() != len {
            self.pixels = vec![0; len];
        }
        Ok(Context2d { surface: self })
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn blend(&mut self, x: u32, y: u32, src: [u8; 4]) {
        let offset = self.offset(x, y);
        let dst = &mut self.pixels[offset..offset + 4];
        let (sa, da) = (src[3], dst[3]);
        if sa == 0 {
            return;
        }
        if sa == 255 || da == 0 {
            dst.copy_from_slice(&src);
            return;
        }
        // source-over on straight alpha
        let sa = f32::from(sa) / 255.0;
        let da = f32::from(da) / 255.0;
        let out_a = sa + da * (1.0 - sa);
        for channel in 0..3 {
            let sc = f32::from(src[channel]);
            let dc = f32::from(dst[channel]);
            dst[channel] = ((sc * sa + dc * da * (1.0 - sa)) / out_a).round() as u8;
        }
        dst[3] = (out_a * 255.0).round() as u8;
    }
}

/// A 2D drawing context borrowed from a surface.
pub struct Context2d<'a> {
    surface: &'a mut CanvasSurface,
}

impl Context2d<'_> {
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, rgba: [u8; 4]) {
        for row in 0..i64::from(height) {
            for col in 0..i64::from(width) {
                if let Some((tx, ty)) = self.target(x + col, y + row) {
                    self.surface.blend(tx, ty, rgba);
                }
            }
        }
    }

    /// Draw `source` with its top-left corner at (`dx`, `dy`), clipped to
    /// this surface.
    pub fn draw_image(&mut self, source: &CanvasSurface, dx: i64, dy: i64) -> Result<(), CanvasError> {
        if source.width == 0 || source.height == 0 {
            return Err(CanvasError::ZeroSizedSource {
                width: source.width,
                height: source.height,
            });
        }
        if !source.is_allocated() {
            return Ok(());
        }
        for sy in 0..source.height {
            for sx in 0..source.width {
                let Some((tx, ty)) = self.target(dx + i64::from(sx), dy + i64::from(sy)) else {
                    continue;
                };
                let offset = source.offset(sx, sy);
                let mut rgba = [0; 4];
                rgba.copy_from_slice(&source.pixels[offset..offset + 4]);
                self.surface.blend(tx, ty, rgba);
            }
        }
        Ok(())
    }

    fn target(&self, x: i64, y: i64) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok().filter(|x| *x < self.surface.width)?;
        let y = u32::try_from(y).ok().filter(|y| *y < self.surface.height)?;
        Some((x, y))
    }
}
