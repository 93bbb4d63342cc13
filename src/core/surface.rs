//! Drawing surface abstraction.
//!
//! The field never talks to a canvas directly. The host hands it something
//! implementing [`Surface`] once per frame and the field pushes draw calls
//! into it. The web crate implements this over `CanvasRenderingContext2d`;
//! tests and benches use [`RecordingSurface`].

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// CSS `rgba(...)` string with `alpha` clamped to `[0, 1]`.
    pub fn css_rgba(self, alpha: f32) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }
}

/// Minimal 2D immediate-mode drawing contract.
pub trait Surface {
    /// Wipe the whole drawable area.
    fn clear(&mut self, width: f32, height: f32);

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32);

    fn stroke_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        color: Rgb,
        alpha: f32,
        line_width: f32,
    );
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear {
        width: f32,
        height: f32,
    },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Rgb,
        alpha: f32,
        line_width: f32,
    },
}

/// A [`Surface`] that records every call, for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.ops.clear();
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ops.push(DrawOp::Clear { width, height });
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) {
        self.ops.push(DrawOp::Circle {
            x,
            y,
            radius,
            color,
            alpha,
        });
    }

    fn stroke_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        color: Rgb,
        alpha: f32,
        line_width: f32,
    ) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            alpha,
            line_width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_palette_hex() {
        assert_eq!(Rgb::from_hex("#22d3ee"), Some(Rgb::new(0x22, 0xd3, 0xee)));
        assert_eq!(Rgb::from_hex("818cf8"), Some(Rgb::new(0x81, 0x8c, 0xf8)));
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn css_rgba_clamps_alpha() {
        let c = Rgb::new(148, 163, 184);
        assert_eq!(c.css_rgba(0.5), "rgba(148, 163, 184, 0.500)");
        assert_eq!(c.css_rgba(-1.0), "rgba(148, 163, 184, 0.000)");
        assert_eq!(c.css_rgba(7.0), "rgba(148, 163, 184, 1.000)");
    }
}
