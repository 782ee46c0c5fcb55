//! Geometric types for screen coordinates and dimensions
//!
//! Provides type-safe wrappers for positions, sizes and monitor rectangles to
//! avoid common integer confusion (e.g., swapping width/height or x/y).

use serde::{Deserialize, Serialize};

/// A position in 2D root-window space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a new position
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A width × height pair
///
/// Using a newtype prevents accidentally swapping width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either side has collapsed to zero
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An axis-aligned rectangle in root-window space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// X coordinate one past the right edge
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Y coordinate one past the bottom edge
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// True if either side has collapsed to zero
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True if the two rectangles share any area
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True if the point lies inside the rectangle
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x && pos.x < self.right() && pos.y >= self.y && pos.y < self.bottom()
    }
}

/// One connected output as reported by the display backend
///
/// The backend returns monitors in slot order: the primary monitor is always
/// slot 0, the remaining outputs follow in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    pub rect: Rect,
    pub primary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(100, 50, 1920, 1080);
        assert_eq!(rect.right(), 2020);
        assert_eq!(rect.bottom(), 1130);
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        let c = Rect::new(100, 0, 100, 100);
        assert!(a.intersects(&b));
        // Touching edges do not overlap
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10, 10, 20, 20);
        assert!(rect.contains(Position::new(10, 10)));
        assert!(rect.contains(Position::new(29, 29)));
        assert!(!rect.contains(Position::new(30, 30)));
    }

    #[test]
    fn test_degenerate() {
        assert!(Rect::new(0, 0, 0, 50).is_degenerate());
        assert!(Dimensions::new(10, 0).is_degenerate());
        assert!(!Dimensions::new(1, 1).is_degenerate());
    }
}
