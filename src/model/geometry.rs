// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canvas-space geometry shared by the model and the hit-tester.

/// A point in canvas pixels (origin top-left, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The outline a node is drawn with, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    Rect {
        center: Point,
        half_width: f64,
        half_height: f64,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    Diamond {
        center: Point,
        half_width: f64,
        half_height: f64,
    },
}

impl Outline {
    pub fn center(&self) -> Point {
        match *self {
            Self::Rect { center, .. } | Self::Circle { center, .. } | Self::Diamond { center, .. } => {
                center
            }
        }
    }

    /// Returns where a ray from the outline's center towards `toward` leaves the outline.
    ///
    /// Falls back to the center when the direction is undefined (target on the center) or the
    /// outline has no extent.
    pub fn boundary_point(&self, toward: Point) -> Point {
        let center = self.center();
        let dx = toward.x - center.x;
        let dy = toward.y - center.y;
        if dx == 0.0 && dy == 0.0 {
            return center;
        }

        let t = match *self {
            Self::Rect {
                half_width,
                half_height,
                ..
            } => {
                if half_width <= 0.0 || half_height <= 0.0 {
                    return center;
                }
                let tx = if dx == 0.0 { f64::INFINITY } else { half_width / dx.abs() };
                let ty = if dy == 0.0 { f64::INFINITY } else { half_height / dy.abs() };
                tx.min(ty)
            }
            Self::Circle { radius, .. } => {
                if radius <= 0.0 {
                    return center;
                }
                radius / dx.hypot(dy)
            }
            Self::Diamond {
                half_width,
                half_height,
                ..
            } => {
                if half_width <= 0.0 || half_height <= 0.0 {
                    return center;
                }
                1.0 / (dx.abs() / half_width + dy.abs() / half_height)
            }
        };

        Point::new(center.x + dx * t, center.y + dy * t)
    }
}
