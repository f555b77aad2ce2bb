/// Axis-aligned rectangles in logical screen pixels.
///
/// The origin is the top-left corner of the screen; `x` grows rightwards and
/// `y` grows downwards, matching the terminal's cursor addressing.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    /// Overlapping region of two rectangles, if they overlap at all.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());
        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Keep the rectangle inside a `width` x `height` screen.  A rectangle
    /// larger than the screen is pinned to the top-left corner.
    pub fn clamp_within(&mut self, width: i32, height: i32) {
        self.x = self.x.min(width - self.w).max(0);
        self.y = self.y.min(height - self.h).max(0);
    }

    /// Rectangle of size `w` x `h` sharing this rectangle's centre.
    pub fn centered(&self, w: i32, h: i32) -> Rect {
        Rect::new(self.center_x() - w / 2, self.center_y() - h / 2, w, h)
    }
}
