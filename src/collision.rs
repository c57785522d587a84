//! Axis-aligned bounding boxes and the overlap test every collision in the
//! game goes through.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        check_collision(
            self.x, self.y, self.w, self.h, other.x, other.y, other.w, other.h,
        )
    }
}

/// Open-interval overlap: rectangles that only share an edge do not collide.
#[allow(clippy::too_many_arguments)]
pub fn check_collision(
    x1: f32,
    y1: f32,
    w1: f32,
    h1: f32,
    x2: f32,
    y2: f32,
    w2: f32,
    h2: f32,
) -> bool {
    x1 < x2 + w2 && x1 + w1 > x2 && y1 < y2 + h2 && y1 + h1 > y2
}
