// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility types and functions.
//!
//! This module provides integer rectangles (used in both image space and
//! display space) and the coordinate mapper that converts between the
//! full-resolution image and the downscaled canvas it is shown on.

/// A 2D point in display (canvas) pixels. Pointer input arrives in this form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One edge of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    X1,
    Y1,
    X2,
    Y2,
}

impl Edge {
    /// The edge on the other side of the same axis.
    pub fn opposite(self) -> Edge {
        match self {
            Edge::X1 => Edge::X2,
            Edge::X2 => Edge::X1,
            Edge::Y1 => Edge::Y2,
            Edge::Y2 => Edge::Y1,
        }
    }
}

/// Axis-aligned integer rectangle delimited by its two corners.
///
/// `x1..x2` and `y1..y2` are half-open pixel spans: a rectangle with
/// `x1 == x2` covers no pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rectangle spanning two arbitrary corners.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        Self {
            x1: a.0.min(b.0),
            y1: a.1.min(b.1),
            x2: a.0.max(b.0),
            y2: a.1.max(b.1),
        }
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn is_empty(&self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }

    pub fn edge(&self, edge: Edge) -> i32 {
        match edge {
            Edge::X1 => self.x1,
            Edge::Y1 => self.y1,
            Edge::X2 => self.x2,
            Edge::Y2 => self.y2,
        }
    }

    /// Intersection test, inclusive of shared edges.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if other.x1 > self.x2 || other.x2 < self.x1 {
            return false;
        }
        if other.y1 > self.y2 || other.y2 < self.y1 {
            return false;
        }
        true
    }

    /// Clip this rectangle to `other`. The result may be empty.
    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }
}

/// Size of the source image in image-space pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageExtent {
    pub width: i32,
    pub height: i32,
}

/// A fractional rectangle in image space, used to address the source bitmap
/// when erasing part of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Converts between image pixel space and display pixel space.
///
/// The display size is computed once when the image is loaded: the natural
/// size is capped by the configured maxima, preserving the aspect ratio and
/// never scaling up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    natural_width: u32,
    natural_height: u32,
    display_width: u32,
    display_height: u32,
}

impl CoordinateMapper {
    /// Fit an image of the given natural size into `max_width` x `max_height`.
    pub fn fit(natural_width: u32, natural_height: u32, max_width: u32, max_height: u32) -> Self {
        let natural_width = natural_width.max(1);
        let natural_height = natural_height.max(1);

        let mut width = natural_width as f64;
        let mut height = natural_height as f64;
        let ratio = width / height;

        if (max_height as f64) < height {
            height = max_height as f64;
            width = height * ratio;
        }
        if (max_width as f64) < width {
            width = max_width as f64;
            height = width / ratio;
        }

        Self {
            natural_width,
            natural_height,
            display_width: (width.floor() as u32).max(1),
            display_height: (height.floor() as u32).max(1),
        }
    }

    pub fn natural_size(&self) -> (u32, u32) {
        (self.natural_width, self.natural_height)
    }

    pub fn display_size(&self) -> (u32, u32) {
        (self.display_width, self.display_height)
    }

    pub fn extent(&self) -> ImageExtent {
        ImageExtent {
            width: self.natural_width as i32,
            height: self.natural_height as i32,
        }
    }

    /// Whole canvas as a display-space rectangle.
    pub fn display_bounds(&self) -> Rect {
        Rect::new(0, 0, self.display_width as i32, self.display_height as i32)
    }

    fn scale_x(&self) -> f64 {
        self.natural_width as f64 / self.display_width as f64
    }

    fn scale_y(&self) -> f64 {
        self.natural_height as f64 / self.display_height as f64
    }

    /// Display x to image x.
    pub fn image_x(&self, display_x: f64) -> f64 {
        display_x * self.scale_x()
    }

    /// Display y to image y.
    pub fn image_y(&self, display_y: f64) -> f64 {
        display_y * self.scale_y()
    }

    /// Image x to display x.
    pub fn display_x(&self, image_x: f64) -> f64 {
        image_x / self.scale_x()
    }

    /// Image y to display y.
    pub fn display_y(&self, image_y: f64) -> f64 {
        image_y / self.scale_y()
    }

    /// Map image-space bounds onto the canvas, flooring each edge.
    pub fn display_rect(&self, image: &Rect) -> Rect {
        Rect {
            x1: self.display_x(image.x1 as f64).floor() as i32,
            y1: self.display_y(image.y1 as f64).floor() as i32,
            x2: self.display_x(image.x2 as f64).floor() as i32,
            y2: self.display_y(image.y2 as f64).floor() as i32,
        }
    }

    /// Map a display point into image space, flooring each coordinate.
    pub fn image_point(&self, point: Point) -> (i32, i32) {
        (
            self.image_x(point.x).floor() as i32,
            self.image_y(point.y).floor() as i32,
        )
    }

    /// The part of the source image that lies under a display rectangle.
    pub fn source_rect(&self, display: &Rect) -> SourceRect {
        let sx1 = self.image_x(display.x1 as f64);
        let sy1 = self.image_y(display.y1 as f64);
        let sx2 = self.image_x(display.x2 as f64);
        let sy2 = self.image_y(display.y2 as f64);
        SourceRect {
            x: sx1,
            y: sy1,
            width: sx2 - sx1,
            height: sy2 - sy1,
        }
    }
}
