//! A fixed-size RGBA pixel buffer.

use crate::color::Rgb;
use crate::error::{Error, Result};

/// One pixel, straight (non-premultiplied) RGBA.
pub type Rgba = [u8; 4];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Surface {
    /// Allocate a surface filled with `background`.
    ///
    /// Allocation failure is reported instead of aborting the process.
    pub fn new(width: u32, height: u32, background: Rgb) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(Error::SurfaceAllocation { width, height })?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| Error::SurfaceAllocation { width, height })?;
        pixels.resize(len, opaque(background));
        Ok(Surface {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn rgb(&self, x: u32, y: u32) -> Option<Rgb> {
        self.pixel(x, y).map(|[r, g, b, _]| Rgb::new(r, g, b))
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(opaque(color));
    }

    /// Copy every pixel of `other` into `self`. Both surfaces must have the
    /// same dimensions, which holds for the two buffers of one canvas.
    pub fn copy_from(&mut self, other: &Surface) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.pixels.copy_from_slice(&other.pixels);
    }

    /// Source-over blend of `color` at `coverage` (0..=1) onto one pixel.
    /// Out-of-bounds coordinates are ignored.
    pub fn blend(&mut self, x: i64, y: i64, color: Rgb, coverage: f32) {
        if coverage <= 0.0 || x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let a = coverage.min(1.0);
        let i = self.index(x as u32, y as u32);
        let dst = &mut self.pixels[i];
        let mix = |d: u8, s: u8| (d as f32 + (s as f32 - d as f32) * a).round() as u8;
        dst[0] = mix(dst[0], color.r);
        dst[1] = mix(dst[1], color.g);
        dst[2] = mix(dst[2], color.b);
        dst[3] = mix(dst[3], 255);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

fn opaque(c: Rgb) -> Rgba {
    [c.r, c.g, c.b, 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            Surface::new(0, 10, Rgb::WHITE),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn blend_mixes_by_coverage() {
        let mut s = Surface::new(2, 2, Rgb::WHITE).unwrap();
        s.blend(0, 0, Rgb::BLACK, 1.0);
        s.blend(1, 0, Rgb::BLACK, 0.5);
        s.blend(-1, 5, Rgb::BLACK, 1.0);
        assert_eq!(s.rgb(0, 0), Some(Rgb::BLACK));
        assert_eq!(s.rgb(1, 0), Some(Rgb::new(128, 128, 128)));
        assert_eq!(s.rgb(0, 1), Some(Rgb::WHITE));
    }
}
