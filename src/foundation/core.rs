/// Rectangle of pixels in image space, `(left, top)` inclusive origin with a
/// width/height extent.
///
/// All engine coordinates are non-negative; a rectangle with a zero width or
/// height is empty and never a valid pull target.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rect {
    /// Leftmost column.
    pub left: u32,
    /// Topmost row.
    pub top: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Build a rectangle from origin and extent.
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle covering `width x height` pixels at the origin.
    pub fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// One past the rightmost column.
    pub fn right(self) -> u32 {
        self.left + self.width
    }

    /// One past the bottom row.
    pub fn bottom(self) -> u32 {
        self.top + self.height
    }

    /// Return `true` when the rectangle contains no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    pub fn pixels(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Return `true` when `other` lies entirely inside `self`.
    pub fn contains(self, other: Rect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Intersection of two rectangles, or `None` when they do not overlap.
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_overlapping_and_disjoint() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 2, 4, 4);
        assert_eq!(a.intersect(b), Some(Rect::new(2, 2, 2, 2)));

        let c = Rect::new(4, 0, 2, 2);
        assert_eq!(a.intersect(c), None);
    }

    #[test]
    fn contains_is_inclusive_of_edges() {
        let a = Rect::sized(10, 10);
        assert!(a.contains(Rect::new(0, 0, 10, 10)));
        assert!(a.contains(Rect::new(9, 9, 1, 1)));
        assert!(!a.contains(Rect::new(9, 9, 2, 1)));
    }

    #[test]
    fn empty_rects_have_no_pixels() {
        assert!(Rect::new(3, 3, 0, 5).is_empty());
        assert_eq!(Rect::sized(3, 2).pixels(), 6);
    }
}
