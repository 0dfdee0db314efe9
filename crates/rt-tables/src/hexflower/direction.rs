//! The seven moves a hexflower walk can make.

use std::fmt;

/// A step direction from the current hex. `Stay` keeps the walk in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Stay on the current hex.
    Stay,
    /// Up.
    Top,
    /// Up and right.
    TopRight,
    /// Down and right.
    BottomRight,
    /// Down.
    Bottom,
    /// Down and left.
    BottomLeft,
    /// Up and left.
    TopLeft,
}

impl Direction {
    /// All directions.
    pub const ALL: [Direction; 7] = [
        Self::Stay,
        Self::Top,
        Self::TopRight,
        Self::BottomRight,
        Self::Bottom,
        Self::BottomLeft,
        Self::TopLeft,
    ];

    /// The name used in hexflower files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Stay => "self",
            Self::Top => "top",
            Self::TopRight => "top_right",
            Self::BottomRight => "bottom_right",
            Self::Bottom => "bottom",
            Self::BottomLeft => "bottom_left",
            Self::TopLeft => "top_left",
        }
    }

    /// Look a direction up by its file name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
