use crate::foundation::error::{KfxError, KfxResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Validated document resolution (`PlayResX` x `PlayResY`).
///
/// A `Frame` can only be built from a positive, finite size, so every API that takes one
/// is guaranteed a meaningful normalization frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "FrameDef")]
pub struct Frame {
    width: f64,
    height: f64,
}

#[derive(serde::Deserialize)]
struct FrameDef {
    width: f64,
    height: f64,
}

impl TryFrom<FrameDef> for Frame {
    type Error = KfxError;

    fn try_from(def: FrameDef) -> Result<Self, Self::Error> {
        Self::new(def.width, def.height)
    }
}

impl Frame {
    /// Build a frame, rejecting unset (zero), negative or non-finite sizes.
    pub fn new(width: f64, height: f64) -> KfxResult<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(KfxError::resolution(format!(
                "cannot calculate positions in a {width}x{height} frame"
            )));
        }
        Ok(Self { width, height })
    }

    /// Frame width in script pixels.
    pub fn width(self) -> f64 {
        self.width
    }

    /// Frame height in script pixels.
    pub fn height(self) -> f64 {
        self.height
    }

    /// Horizontal frame center.
    pub fn center_x(self) -> f64 {
        self.width / 2.0
    }

    /// Vertical frame center.
    pub fn center_y(self) -> f64 {
        self.height / 2.0
    }
}

/// Vertical row of the numpad alignment grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Row {
    /// Codes 1, 2, 3.
    Bottom,
    /// Codes 4, 5, 6.
    Middle,
    /// Codes 7, 8, 9.
    Top,
}

/// Horizontal column of the numpad alignment grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Codes 1, 4, 7.
    Left,
    /// Codes 2, 5, 8.
    Center,
    /// Codes 3, 6, 9.
    Right,
}

/// Alignment code 1-9 decoded into its grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Alignment {
    /// Vertical anchor row.
    pub row: Row,
    /// Horizontal anchor column.
    pub column: Column,
}

impl Alignment {
    /// Decode a numpad alignment code.
    pub fn from_code(code: u8) -> KfxResult<Self> {
        if !(1..=9).contains(&code) {
            return Err(KfxError::validation(format!(
                "alignment must be in 1..=9, got {code}"
            )));
        }
        let row = match (code - 1) / 3 {
            0 => Row::Bottom,
            1 => Row::Middle,
            _ => Row::Top,
        };
        let column = match (code - 1) % 3 {
            0 => Column::Left,
            1 => Column::Center,
            _ => Column::Right,
        };
        Ok(Self { row, column })
    }
}

/// Resolved position and size of one text unit, in script pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct Geometry {
    /// Advance width.
    pub width: f64,
    /// Ink height.
    pub height: f64,
    /// Anchor x, chosen from left/center/right by the alignment column.
    pub x: f64,
    /// Anchor y, chosen from top/middle/bottom by the alignment row.
    pub y: f64,
    /// Left edge.
    pub left: f64,
    /// Horizontal center.
    pub center: f64,
    /// Right edge.
    pub right: f64,
    /// Top edge.
    pub top: f64,
    /// Vertical middle.
    pub middle: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl Geometry {
    /// Set `left`/`center`/`right` from a left edge and the current width.
    pub fn set_horizontal(&mut self, left: f64) {
        self.left = left;
        self.center = left + self.width / 2.0;
        self.right = left + self.width;
    }

    /// Copy the alignment anchor into `x`/`y`.
    pub fn apply_anchor(&mut self, alignment: Alignment) {
        self.x = match alignment.column {
            Column::Left => self.left,
            Column::Center => self.center,
            Column::Right => self.right,
        };
        self.y = match alignment.row {
            Row::Bottom => self.bottom,
            Row::Middle => self.middle,
            Row::Top => self.top,
        };
    }
}

/// Layout state of a text unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
#[serde(tag = "state", content = "geometry", rename_all = "snake_case")]
pub enum Placement {
    /// The resolver has not run on this unit yet.
    #[default]
    Unlaid,
    /// Geometry computed by the resolver.
    Laid(Geometry),
}

impl Placement {
    /// Geometry, if the unit has been laid out.
    pub fn geometry(&self) -> Option<&Geometry> {
        match self {
            Self::Unlaid => None,
            Self::Laid(g) => Some(g),
        }
    }

    /// Geometry or a validation error naming `what`.
    pub fn require(&self, what: &str) -> KfxResult<&Geometry> {
        self.geometry()
            .ok_or_else(|| KfxError::validation(format!("{what} has not been laid out")))
    }

    /// Whether the resolver has populated this unit.
    pub fn is_laid(&self) -> bool {
        matches!(self, Self::Laid(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
