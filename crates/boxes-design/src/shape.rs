//! The 16-position shape table (spec.md §3.2, §4.2).
//!
//! A compile-time topology: which of the 16 named positions are corners,
//! how they group into the four sides, and in what order. Grounded on
//! `examples/original_source/src/shape.h`'s `SHAPE` enum and `sides[]`
//! table; implemented here as closed Rust enums rather than index
//! arithmetic over a C array, per spec.md §9 "Sum types for shapes".

/// One of the 16 named shape positions, clockwise from the NW corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    Nw,
    Nnw,
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
}

impl Shape {
    pub const ALL: [Shape; 16] = [
        Shape::Nw,
        Shape::Nnw,
        Shape::N,
        Shape::Nne,
        Shape::Ne,
        Shape::Ene,
        Shape::E,
        Shape::Ese,
        Shape::Se,
        Shape::Sse,
        Shape::S,
        Shape::Ssw,
        Shape::Sw,
        Shape::Wsw,
        Shape::W,
        Shape::Wnw,
    ];

    pub fn is_corner(self) -> bool {
        matches!(self, Shape::Nw | Shape::Ne | Shape::Se | Shape::Sw)
    }

    /// Case-insensitive lookup by the config-file shape name.
    pub fn from_name(name: &str) -> Option<Shape> {
        Some(match name.to_ascii_lowercase().as_str() {
            "nw" => Shape::Nw,
            "nnw" => Shape::Nnw,
            "n" => Shape::N,
            "nne" => Shape::Nne,
            "ne" => Shape::Ne,
            "ene" => Shape::Ene,
            "e" => Shape::E,
            "ese" => Shape::Ese,
            "se" => Shape::Se,
            "sse" => Shape::Sse,
            "s" => Shape::S,
            "ssw" => Shape::Ssw,
            "sw" => Shape::Sw,
            "wsw" => Shape::Wsw,
            "w" => Shape::W,
            "wnw" => Shape::Wnw,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Nw => "nw",
            Shape::Nnw => "nnw",
            Shape::N => "n",
            Shape::Nne => "nne",
            Shape::Ne => "ne",
            Shape::Ene => "ene",
            Shape::E => "e",
            Shape::Ese => "ese",
            Shape::Se => "se",
            Shape::Sse => "sse",
            Shape::S => "s",
            Shape::Ssw => "ssw",
            Shape::Sw => "sw",
            Shape::Wsw => "wsw",
            Shape::W => "w",
            Shape::Wnw => "wnw",
        }
    }
}

/// One of the four sides of a design; each is a 5-tuple of shapes (two
/// corners, three edges) per spec.md §3.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// The 5 shape positions making up this side, in drawing order.
    pub const fn shapes(self) -> [Shape; 5] {
        match self {
            Side::Top => [Shape::Nw, Shape::Nnw, Shape::N, Shape::Nne, Shape::Ne],
            Side::Right => [Shape::Ne, Shape::Ene, Shape::E, Shape::Ese, Shape::Se],
            Side::Bottom => [Shape::Se, Shape::Sse, Shape::S, Shape::Ssw, Shape::Sw],
            Side::Left => [Shape::Sw, Shape::Wsw, Shape::W, Shape::Wnw, Shape::Nw],
        }
    }

    /// The 3 edge positions on this side (corners excluded), in order.
    pub fn edges(self) -> [Shape; 3] {
        let s = self.shapes();
        [s[1], s[2], s[3]]
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

/// Index (0..=4) of `shape` within `side`, if it belongs there.
pub fn find_shape(side: Side, shape: Shape) -> Option<usize> {
    side.shapes().iter().position(|&s| s == shape)
}

/// Maximum value across a sub-list; used to size corner rectangles during
/// assembly (spec.md §4.2). Returns 0 for an empty iterator.
pub fn widest(values: impl IntoIterator<Item = usize>) -> usize {
    values.into_iter().max().unwrap_or(0)
}

pub fn highest(values: impl IntoIterator<Item = usize>) -> usize {
    values.into_iter().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides_share_corners_with_neighbours() {
        assert_eq!(Side::Top.shapes()[4], Side::Right.shapes()[0]);
        assert_eq!(Side::Right.shapes()[4], Side::Bottom.shapes()[0]);
        assert_eq!(Side::Bottom.shapes()[4], Side::Left.shapes()[0]);
        assert_eq!(Side::Left.shapes()[4], Side::Top.shapes()[0]);
    }

    #[test]
    fn corners_are_exactly_four() {
        let corners: Vec<_> = Shape::ALL.iter().copied().filter(|s| s.is_corner()).collect();
        assert_eq!(corners.len(), 4);
    }

    #[test]
    fn find_shape_locates_index() {
        assert_eq!(find_shape(Side::Top, Shape::N), Some(2));
        assert_eq!(find_shape(Side::Top, Shape::Sw), None);
    }

    #[test]
    fn name_roundtrip() {
        for s in Shape::ALL {
            assert_eq!(Shape::from_name(s.name()), Some(s));
        }
    }
}
