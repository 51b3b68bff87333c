// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing surfaces.
//!
//! [`Surface`] is the small set of drawing primitives the render engine
//! needs. [`RasterCanvas`] implements it on an in-memory RGBA frame buffer
//! and keeps track of which pixels changed so only that part has to be
//! uploaded to the GPU.

use crate::util::geometry::{CoordinateMapper, Rect, SourceRect};
use image::{Pixel, Rgba, RgbaImage};

/// A one pixel wide border segment. Coordinates are pixel columns/rows;
/// the span end is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Vertical { x: i32, y1: i32, y2: i32 },
    Horizontal { y: i32, x1: i32, x2: i32 },
}

impl Stroke {
    pub fn is_empty(&self) -> bool {
        match *self {
            Stroke::Vertical { y1, y2, .. } => y2 <= y1,
            Stroke::Horizontal { x1, x2, .. } => x2 <= x1,
        }
    }

    /// Pixels covered by the stroke.
    pub fn rect(&self) -> Rect {
        match *self {
            Stroke::Vertical { x, y1, y2 } => Rect::new(x, y1, x + 1, y2),
            Stroke::Horizontal { y, x1, x2 } => Rect::new(x1, y, x2, y + 1),
        }
    }
}

pub const STROKE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

pub trait Surface {
    /// Reset every pixel.
    fn clear(&mut self);

    /// Copy the `src` part of the source image, scaled, into `dst`.
    fn draw_source(&mut self, src: SourceRect, dst: Rect);

    /// Composite a translucent fill over `rect`.
    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>);

    fn stroke(&mut self, stroke: Stroke);
}

/// Software canvas backed by `image` buffers.
pub struct RasterCanvas {
    source: RgbaImage,
    frame: RgbaImage,
    damage: Option<Rect>,
}

impl RasterCanvas {
    /// Create a canvas sized to the mapper's display dimensions.
    pub fn new(source: RgbaImage, mapper: &CoordinateMapper) -> Self {
        let (width, height) = mapper.display_size();
        Self {
            source,
            frame: RgbaImage::new(width, height),
            damage: None,
        }
    }

    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// Region touched since the last call, if any.
    pub fn take_damage(&mut self) -> Option<Rect> {
        self.damage.take()
    }

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.frame.width() as i32, self.frame.height() as i32)
    }

    fn clip(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersect(&self.bounds());
        if clipped.is_empty() {
            None
        } else {
            Some(clipped)
        }
    }

    fn mark(&mut self, rect: Rect) {
        self.damage = Some(match self.damage {
            Some(damage) => damage.union(&rect),
            None => rect,
        });
    }
}

impl Surface for RasterCanvas {
    fn clear(&mut self) {
        for pixel in self.frame.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
        let bounds = self.bounds();
        self.mark(bounds);
    }

    fn draw_source(&mut self, src: SourceRect, dst: Rect) {
        if dst.is_empty() || self.source.width() == 0 || self.source.height() == 0 {
            return;
        }
        let Some(clipped) = self.clip(dst) else {
            return;
        };
        let x_ratio = src.width / dst.width() as f64;
        let y_ratio = src.height / dst.height() as f64;
        let max_x = self.source.width() as i64 - 1;
        let max_y = self.source.height() as i64 - 1;

        for py in clipped.y1..clipped.y2 {
            let sy = (src.y + (py - dst.y1) as f64 * y_ratio + y_ratio / 2.0).floor() as i64;
            let sy = sy.clamp(0, max_y) as u32;
            for px in clipped.x1..clipped.x2 {
                let sx = (src.x + (px - dst.x1) as f64 * x_ratio + x_ratio / 2.0).floor() as i64;
                let sx = sx.clamp(0, max_x) as u32;
                let pixel = *self.source.get_pixel(sx, sy);
                self.frame.put_pixel(px as u32, py as u32, pixel);
            }
        }
        self.mark(clipped);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let Some(clipped) = self.clip(rect) else {
            return;
        };
        for py in clipped.y1..clipped.y2 {
            for px in clipped.x1..clipped.x2 {
                self.frame.get_pixel_mut(px as u32, py as u32).blend(&color);
            }
        }
        self.mark(clipped);
    }

    fn stroke(&mut self, stroke: Stroke) {
        let Some(clipped) = self.clip(stroke.rect()) else {
            return;
        };
        for py in clipped.y1..clipped.y2 {
            for px in clipped.x1..clipped.x2 {
                self.frame.put_pixel(px as u32, py as u32, STROKE_COLOR);
            }
        }
        self.mark(clipped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_draw_source_samples_downscaled() {
        let mapper = CoordinateMapper::fit(8, 8, 4, 4);
        let mut canvas = RasterCanvas::new(gradient(8, 8), &mapper);
        let full = mapper.display_bounds();
        canvas.draw_source(mapper.source_rect(&full), full);

        // Display pixel 1 covers source pixels 2..4; its centre samples 3.
        assert_eq!(*canvas.frame().get_pixel(1, 2), Rgba([3, 5, 0, 255]));
        assert_eq!(canvas.take_damage(), Some(full));
        assert_eq!(canvas.take_damage(), None);
    }

    #[test]
    fn test_fill_blends_and_clips() {
        let mapper = CoordinateMapper::fit(4, 4, 4, 4);
        let mut canvas = RasterCanvas::new(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])), &mapper);
        let full = mapper.display_bounds();
        canvas.draw_source(mapper.source_rect(&full), full);
        canvas.take_damage();

        canvas.fill_rect(Rect::new(2, 2, 10, 10), Rgba([255, 255, 255, 102]));
        let blended = canvas.frame().get_pixel(3, 3);
        assert!(blended[0] > 90 && blended[0] < 115);
        assert_eq!(blended[3], 255);
        assert_eq!(*canvas.frame().get_pixel(1, 1), Rgba([0, 0, 0, 255]));
        assert_eq!(canvas.take_damage(), Some(Rect::new(2, 2, 4, 4)));
    }

    #[test]
    fn test_stroke_is_opaque_and_idempotent() {
        let mapper = CoordinateMapper::fit(4, 4, 4, 4);
        let mut canvas = RasterCanvas::new(RgbaImage::from_pixel(4, 4, Rgba([200, 200, 200, 255])), &mapper);
        let stroke = Stroke::Vertical { x: 1, y1: 0, y2: 3 };
        canvas.stroke(stroke);
        canvas.stroke(stroke);
        assert_eq!(*canvas.frame().get_pixel(1, 2), STROKE_COLOR);
        assert_eq!(*canvas.frame().get_pixel(1, 3), Rgba([0, 0, 0, 0]));
        assert_eq!(canvas.take_damage(), Some(Rect::new(1, 0, 2, 3)));
    }
}
