//! Corner geometry computation
//!
//! Pure rectangle math: corner anchors, pressure-barrier line segments sized
//! as a percentage of the monitor dimension, and clickable-region rectangles
//! with edge expansion. The joint expansion rules for all four corners of a
//! monitor live here too, because a corner cannot decide them in isolation.

use crate::backend::BarrierLine;
use crate::common::types::{Dimensions, Position, Rect};
use crate::config::Quadrant;
use crate::constants::geometry::{CLICK_REGION_PX, FULL_EDGE, HALF_EDGE};

/// The absolute pixel anchor of a quadrant on a monitor
pub fn anchor(monitor: &Rect, quadrant: Quadrant) -> Position {
    Position::new(
        if quadrant.left() { monitor.x } else { monitor.right() },
        if quadrant.top() { monitor.y } else { monitor.bottom() },
    )
}

/// The pressure-barrier pair of one corner
///
/// `horizontal` runs along the top/bottom monitor edge and blocks vertical
/// pointer motion; `vertical` runs along the left/right edge and blocks
/// horizontal motion. An axis whose percentage rounds down to zero pixels is
/// omitted rather than allocated degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BarrierPair {
    pub horizontal: Option<BarrierLine>,
    pub vertical: Option<BarrierLine>,
}

/// Compute the barrier pair for a corner
///
/// `size_h_percent` scales the horizontal barrier by monitor width,
/// `size_v_percent` the vertical one by monitor height.
pub fn barrier_pair(
    monitor: &Rect,
    quadrant: Quadrant,
    size_h_percent: u8,
    size_v_percent: u8,
) -> BarrierPair {
    let corner = anchor(monitor, quadrant);
    let h_len = (monitor.width * size_h_percent as u32 / 100) as i32;
    let v_len = (monitor.height * size_v_percent as u32 / 100) as i32;

    let horizontal = (h_len > 0).then(|| {
        let x2 = if quadrant.left() { corner.x + h_len } else { corner.x - h_len };
        BarrierLine { x1: corner.x, y1: corner.y, x2, y2: corner.y }
    });
    let vertical = (v_len > 0).then(|| {
        let y2 = if quadrant.top() { corner.y + v_len } else { corner.y - v_len };
        BarrierLine { x1: corner.x, y1: corner.y, x2: corner.x, y2 }
    });

    BarrierPair { horizontal, vertical }
}

/// Expansion state of one corner's clickable region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Expansion {
    /// Extend along the horizontal (top/bottom) edge
    pub h: bool,
    /// Extend along the vertical (left/right) edge
    pub v: bool,
    /// This corner may claim nearly the whole horizontal edge
    pub full_h: bool,
    /// This corner may claim nearly the whole vertical edge
    pub full_v: bool,
}

/// Jointly compute the expansion state of all four corners of a monitor
///
/// `flags[i]` carries the configured (h_expand, v_expand) of
/// `Quadrant::ALL[i]`. A corner gets the "full" share of an edge only when
/// the neighbor sharing that edge does not also expand into it; otherwise
/// each side gets half. This keeps two corners' regions from ever claiming
/// the same strip of screen.
pub fn monitor_expansions(flags: [(bool, bool); 4]) -> [Expansion; 4] {
    let of = |quadrant: Quadrant| flags[quadrant.index()];

    let mut result = [Expansion::default(); 4];
    for (i, quadrant) in Quadrant::ALL.into_iter().enumerate() {
        let (h, v) = flags[i];
        result[i] = Expansion {
            h,
            v,
            full_h: h && !of(quadrant.horizontal_neighbor()).0,
            full_v: v && !of(quadrant.vertical_neighbor()).1,
        };
    }
    result
}

/// Clickable-region rectangles for one corner
///
/// Zero, one or two rects: none if everything degenerates, one for the plain
/// or singly-expanded case, two orthogonal strips when the corner expands
/// along both edges (two rects instead of one L-shaped region).
pub fn click_regions(monitor: &Rect, quadrant: Quadrant, expansion: Expansion) -> Vec<Rect> {
    let corner = anchor(monitor, quadrant);
    let base = CLICK_REGION_PX;

    let edge_share = |edge: u32, full: bool| {
        let (num, den) = if full { FULL_EDGE } else { HALF_EDGE };
        edge * num / den
    };

    let place = |size: Dimensions| {
        let x = if quadrant.left() { corner.x } else { corner.x - size.width as i32 };
        let y = if quadrant.top() { corner.y } else { corner.y - size.height as i32 };
        Rect::new(x, y, size.width, size.height)
    };

    let mut regions = Vec::with_capacity(2);
    if expansion.h {
        regions.push(place(Dimensions::new(edge_share(monitor.width, expansion.full_h), base)));
    }
    if expansion.v {
        regions.push(place(Dimensions::new(base, edge_share(monitor.height, expansion.full_v))));
    }
    if regions.is_empty() {
        regions.push(place(Dimensions::new(base, base)));
    }
    regions.retain(|r| !r.is_degenerate());
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONITOR: Rect = Rect { x: 0, y: 0, width: 1920, height: 1080 };

    #[test]
    fn test_anchors() {
        assert_eq!(anchor(&MONITOR, Quadrant::TopLeft), Position::new(0, 0));
        assert_eq!(anchor(&MONITOR, Quadrant::BottomRight), Position::new(1920, 1080));
        let shifted = Rect::new(1920, 0, 1280, 1024);
        assert_eq!(anchor(&shifted, Quadrant::TopLeft), Position::new(1920, 0));
    }

    #[test]
    fn test_barrier_pair_ten_percent_on_full_hd() {
        let pair = barrier_pair(&MONITOR, Quadrant::TopLeft, 10, 10);
        assert_eq!(
            pair.horizontal,
            Some(BarrierLine { x1: 0, y1: 0, x2: 192, y2: 0 })
        );
        assert_eq!(
            pair.vertical,
            Some(BarrierLine { x1: 0, y1: 0, x2: 0, y2: 108 })
        );
    }

    #[test]
    fn test_barrier_pair_extends_inward_from_bottom_right() {
        let pair = barrier_pair(&MONITOR, Quadrant::BottomRight, 25, 50);
        assert_eq!(
            pair.horizontal,
            Some(BarrierLine { x1: 1920, y1: 1080, x2: 1440, y2: 1080 })
        );
        assert_eq!(
            pair.vertical,
            Some(BarrierLine { x1: 1920, y1: 1080, x2: 1920, y2: 540 })
        );
    }

    #[test]
    fn test_zero_percent_axis_is_skipped() {
        let pair = barrier_pair(&MONITOR, Quadrant::TopLeft, 0, 10);
        assert_eq!(pair.horizontal, None);
        assert!(pair.vertical.is_some());

        // Tiny monitor: 5% of 16px rounds to 0
        let tiny = Rect::new(0, 0, 16, 16);
        let pair = barrier_pair(&tiny, Quadrant::TopLeft, 5, 5);
        assert_eq!(pair, BarrierPair::default());
    }

    #[test]
    fn test_full_expand_is_exclusive_on_shared_edges() {
        // Top-left and top-right both expand horizontally: neither may take
        // the full top edge.
        let expansions = monitor_expansions([
            (true, false),  // top-left
            (true, false),  // top-right
            (false, false), // bottom-left
            (false, false), // bottom-right
        ]);
        assert!(expansions[0].h && !expansions[0].full_h);
        assert!(expansions[1].h && !expansions[1].full_h);

        // Alone on the edge, top-left gets the full share.
        let expansions = monitor_expansions([
            (true, true),
            (false, false),
            (false, false),
            (false, false),
        ]);
        assert!(expansions[0].full_h);
        assert!(expansions[0].full_v);
    }

    #[test]
    fn test_region_shares_of_the_edge() {
        // Half share when contested
        let contested = Expansion { h: true, v: false, full_h: false, full_v: false };
        let regions = click_regions(&MONITOR, Quadrant::TopLeft, contested);
        assert_eq!(regions, vec![Rect::new(0, 0, 960, CLICK_REGION_PX)]);

        // 7/8 share when alone
        let alone = Expansion { h: true, v: false, full_h: true, full_v: false };
        let regions = click_regions(&MONITOR, Quadrant::TopLeft, alone);
        assert_eq!(regions, vec![Rect::new(0, 0, 1680, CLICK_REGION_PX)]);
    }

    #[test]
    fn test_both_axes_yield_two_orthogonal_strips() {
        let expansion = Expansion { h: true, v: true, full_h: true, full_v: false };
        let regions = click_regions(&MONITOR, Quadrant::BottomRight, expansion);
        assert_eq!(regions.len(), 2);
        // Horizontal strip hugs the bottom edge, vertical strip the right edge
        assert_eq!(regions[0], Rect::new(240, 1072, 1680, 8));
        assert_eq!(regions[1], Rect::new(1912, 540, 8, 540));
    }

    #[test]
    fn test_minimal_region_is_corner_sized() {
        let regions = click_regions(&MONITOR, Quadrant::TopRight, Expansion::default());
        assert_eq!(
            regions,
            vec![Rect::new(1920 - CLICK_REGION_PX as i32, 0, CLICK_REGION_PX, CLICK_REGION_PX)]
        );
    }
}
