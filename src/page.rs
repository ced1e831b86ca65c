use log::warn;

/// Paper sizes in points (width, height), portrait.
const PAPER_SIZES: [(&str, f32, f32); 6] = [
    ("A3", 841.89, 1190.55),
    ("A4", 595.28, 841.89),
    ("A5", 419.53, 595.28),
    ("LETTER", 612.0, 792.0),
    ("LEGAL", 612.0, 1008.0),
    ("TABLOID", 792.0, 1224.0),
];

/// Border inset on the left, right and bottom edges, before scaling.
const SIDE_MARGIN: f32 = 30.0;
/// Border inset on the top edge, before scaling.
const TOP_MARGIN: f32 = 40.0;

/// Layout scale for a paper size.
///
/// Matches the literal name only: `"a3"` is not `"A3"` and gets 1.0, even
/// though [`paper_dimensions`] sizes it as A3 paper.
pub fn resolve_scale(paper_size: &str) -> f32 {
    match paper_size {
        "A3" => 1.4,
        "A4" => 1.0,
        "A5" => 0.7,
        _ => 1.0,
    }
}

/// Physical page size in points. Unknown names get A4 paper.
pub fn paper_dimensions(paper_size: &str) -> (f32, f32) {
    let wanted = paper_size.trim().to_ascii_uppercase();
    match PAPER_SIZES.iter().find(|(name, _, _)| *name == wanted) {
        Some(&(_, width, height)) => (width, height),
        None => {
            warn!("Unknown paper size '{}', using A4 dimensions", paper_size);
            (PAPER_SIZES[1].1, PAPER_SIZES[1].2)
        }
    }
}

/// Page measurements for one render, all in points from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub scale: f32,
    pub width: f32,
    pub height: f32,
    pub side_margin: f32,
    pub top_margin: f32,
}

impl PageGeometry {
    pub fn new(scale: f32, width: f32, height: f32) -> Self {
        PageGeometry {
            scale,
            width,
            height,
            side_margin: SIDE_MARGIN * scale,
            top_margin: TOP_MARGIN * scale,
        }
    }

    /// Left edge of the border.
    pub fn left(&self) -> f32 {
        self.side_margin
    }

    /// Right edge of the border.
    pub fn right(&self) -> f32 {
        self.width - self.side_margin
    }

    /// Bottom edge of the border.
    pub fn bottom(&self) -> f32 {
        self.height - self.side_margin
    }

    /// Scale a layout constant.
    pub fn s(&self, value: f32) -> f32 {
        value * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sizes_scale() {
        assert_eq!(resolve_scale("A3"), 1.4);
        assert_eq!(resolve_scale("A4"), 1.0);
        assert_eq!(resolve_scale("A5"), 0.7);
    }

    #[test]
    fn other_sizes_scale_like_a4() {
        for size in ["LETTER", "a3", "", "B5", "A4 "] {
            assert_eq!(resolve_scale(size), 1.0, "size {:?}", size);
        }
    }

    #[test]
    fn dimensions_ignore_case() {
        assert_eq!(paper_dimensions("a3"), (841.89, 1190.55));
        assert_eq!(paper_dimensions("Letter"), (612.0, 792.0));
    }

    #[test]
    fn unknown_dimensions_are_a4() {
        assert_eq!(paper_dimensions("postcard"), (595.28, 841.89));
    }

    #[test]
    fn margins_follow_scale() {
        let geometry = PageGeometry::new(0.7, 419.53, 595.28);
        assert!((geometry.side_margin - 21.0).abs() < 1e-4);
        assert!((geometry.top_margin - 28.0).abs() < 1e-4);
        assert!((geometry.right() - (419.53 - 21.0)).abs() < 1e-3);
    }
}
