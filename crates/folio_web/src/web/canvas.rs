use std::f64::consts::TAU;

use folio::surface::{Rgb, Surface};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("canvas: get_context threw")]
    ContextThrew,
    #[error("canvas: missing 2d context")]
    Missing,
    #[error("canvas: context is not 2d")]
    NotTwoD,
}

/// [`Surface`] over a 2D canvas context.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn attach(canvas: &HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| SurfaceError::ContextThrew)?
            .ok_or(SurfaceError::Missing)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::NotTwoD)?;
        Ok(Self { ctx })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    #[allow(deprecated)]
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(x as f64, y as f64, radius.max(0.0) as f64, 0.0, TAU);
        self.ctx
            .set_fill_style(&JsValue::from_str(&color.css_rgba(alpha)));
        self.ctx.fill();
    }

    #[allow(deprecated)]
    fn stroke_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        color: Rgb,
        alpha: f32,
        line_width: f32,
    ) {
        self.ctx.begin_path();
        self.ctx
            .set_stroke_style(&JsValue::from_str(&color.css_rgba(alpha)));
        self.ctx.set_line_width(line_width as f64);
        self.ctx.move_to(from.0 as f64, from.1 as f64);
        self.ctx.line_to(to.0 as f64, to.1 as f64);
        self.ctx.stroke();
    }
}
