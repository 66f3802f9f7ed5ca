use std::collections::HashMap;

use crate::foundation::{
    core::Alignment,
    error::{KfxError, KfxResult},
};

/// Typographic formatting rules applied to dialogue lines.
///
/// Colors are carried verbatim (`&HAABBGGRR` strings); kfx never converts them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Style {
    /// Style name referenced by lines.
    pub name: String,
    /// Font family name.
    pub font_name: String,
    /// Nominal font size in script pixels.
    pub font_size: f64,
    /// Primary (fill) color.
    pub primary_color: String,
    /// Secondary color, used by karaoke highlighting.
    pub secondary_color: String,
    /// Border color.
    pub outline_color: String,
    /// Shadow color.
    pub back_color: String,
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Underline decoration.
    pub underline: bool,
    /// Strike-through decoration.
    pub strikeout: bool,
    /// Horizontal stretch in percent.
    pub scale_x: f64,
    /// Vertical stretch in percent.
    pub scale_y: f64,
    /// Extra space after every glyph, in pixels.
    pub spacing: f64,
    /// Rotation in degrees.
    pub angle: f64,
    /// `true` for an opaque box instead of an outline.
    pub border_style: bool,
    /// Border thickness.
    pub outline: f64,
    /// Shadow distance.
    pub shadow: f64,
    /// Numpad alignment code (1-9).
    pub alignment: u8,
    /// Left margin.
    pub margin_l: i32,
    /// Right margin.
    pub margin_r: i32,
    /// Vertical margin (bottom, or top for codes 7-9).
    pub margin_v: i32,
    /// Font charset.
    pub encoding: i32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            font_name: "Arial".to_string(),
            font_size: 48.0,
            primary_color: "&H00FFFFFF".to_string(),
            secondary_color: "&H000000FF".to_string(),
            outline_color: "&H00000000".to_string(),
            back_color: "&H00000000".to_string(),
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            scale_x: 100.0,
            scale_y: 100.0,
            spacing: 0.0,
            angle: 0.0,
            border_style: false,
            outline: 2.0,
            shadow: 2.0,
            alignment: 2,
            margin_l: 10,
            margin_r: 10,
            margin_v: 10,
            encoding: 1,
        }
    }
}

impl Style {
    /// Decoded alignment grid cell.
    pub fn alignment(&self) -> KfxResult<Alignment> {
        Alignment::from_code(self.alignment)
    }

    /// Copy of this style with optional horizontal/vertical scale overrides.
    pub fn with_scale(&self, scale_x: Option<f64>, scale_y: Option<f64>) -> Style {
        let mut out = self.clone();
        if let Some(sx) = scale_x {
            out.scale_x = sx;
        }
        if let Some(sy) = scale_y {
            out.scale_y = sy;
        }
        out
    }

    /// Check numeric fields for values no layout can use.
    pub fn validate(&self) -> KfxResult<()> {
        self.alignment()?;
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(KfxError::validation(format!(
                "style '{}': font_size must be finite and > 0",
                self.name
            )));
        }
        for (field, v) in [("scale_x", self.scale_x), ("scale_y", self.scale_y)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(KfxError::validation(format!(
                    "style '{}': {field} must be finite and > 0",
                    self.name
                )));
            }
        }
        if !self.outline.is_finite() || !self.spacing.is_finite() {
            return Err(KfxError::validation(format!(
                "style '{}': outline and spacing must be finite",
                self.name
            )));
        }
        Ok(())
    }
}

/// Non-owning handle to a [`Style`] inside a [`StyleTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct StyleId(pub(crate) usize);

impl StyleId {
    /// Position of the style in its table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Document-wide style storage; read-only once the document is loaded.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<Style>", into = "Vec<Style>")]
pub struct StyleTable {
    styles: Vec<Style>,
    by_name: HashMap<String, StyleId>,
}

impl StyleTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a style. A later definition with the same name replaces the earlier one.
    pub fn insert(&mut self, style: Style) -> StyleId {
        if let Some(&id) = self.by_name.get(&style.name) {
            self.styles[id.0] = style;
            return id;
        }
        let id = StyleId(self.styles.len());
        self.by_name.insert(style.name.clone(), id);
        self.styles.push(style);
        id
    }

    /// Lookup a handle by style name.
    pub fn id_for(&self, name: &str) -> Option<StyleId> {
        self.by_name.get(name).copied()
    }

    /// Resolve a handle.
    pub fn get(&self, id: StyleId) -> KfxResult<&Style> {
        self.styles
            .get(id.0)
            .ok_or_else(|| KfxError::validation(format!("unknown StyleId {}", id.0)))
    }

    /// Number of distinct styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether the table holds no styles.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Iterate styles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &Style)> {
        self.styles.iter().enumerate().map(|(i, s)| (StyleId(i), s))
    }
}

impl From<Vec<Style>> for StyleTable {
    fn from(styles: Vec<Style>) -> Self {
        let mut table = Self::new();
        for style in styles {
            table.insert(style);
        }
        table
    }
}

impl From<StyleTable> for Vec<Style> {
    fn from(table: StyleTable) -> Self {
        table.styles
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/style.rs"]
mod tests;
