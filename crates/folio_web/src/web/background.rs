//! Full-viewport particle canvas behind the page.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use folio::field::{FieldConfig, ParticleField};
use leptos::ev;
use leptos::html::Canvas;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::canvas::CanvasSurface;
use crate::ui_model::frame_step;

/// A self-rearming `requestAnimationFrame` loop.
///
/// The callback re-arms through a weak handle, so dropping the loop (or
/// calling [`FrameLoop::stop`]) is enough to end it.
struct FrameLoop {
    handle: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameLoop {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            handle: Cell::new(None),
            callback: RefCell::new(None),
        })
    }

    fn start(&self, callback: Closure<dyn FnMut(f64)>) {
        self.stop();
        *self.callback.borrow_mut() = Some(callback);
        self.schedule();
    }

    fn schedule(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => self.handle.set(Some(id)),
            Err(_) => {
                tracing::debug!("requestAnimationFrame threw; particle loop stopped");
                self.handle.set(None);
            }
        }
    }

    fn stop(&self) {
        if let Some(id) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        self.callback.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn viewport_size() -> Option<(f64, f64)> {
    let window = web_sys::window()?;
    let w = window.inner_width().ok()?.as_f64()?;
    let h = window.inner_height().ok()?.as_f64()?;
    Some((w, h))
}

#[component]
pub fn ParticleBackground(#[prop(optional)] config: Option<FieldConfig>) -> impl IntoView {
    let canvas_ref = NodeRef::<Canvas>::new();
    let seed = js_sys::Date::now() as u64;
    let field = StoredValue::new(ParticleField::new(config.unwrap_or_default(), seed));
    let frame_loop = StoredValue::new_local(FrameLoop::new());

    let resize = move || {
        let (Some(canvas), Some((w, h))) = (canvas_ref.get_untracked(), viewport_size()) else {
            return;
        };
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);
        field.update_value(|f| f.initialize(w as f32, h as f32));
    };

    Effect::new(move |_| {
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        let mut surface = match CanvasSurface::attach(&canvas) {
            Ok(surface) => surface,
            Err(err) => {
                tracing::debug!(error = %err, "particle background disabled");
                return;
            }
        };

        resize();

        let weak_loop = frame_loop.with_value(Rc::downgrade);
        let mut last_frame: Option<f64> = None;
        let callback = Closure::wrap(Box::new(move |now: f64| {
            let dt = frame_step(last_frame, now);
            last_frame = Some(now);

            let drawn = field.try_update_value(|f| {
                f.advance(dt);
                f.render(&mut surface)
            });
            if drawn.is_none() {
                return;
            }
            if let Some(frame_loop) = weak_loop.upgrade() {
                frame_loop.schedule();
            }
        }) as Box<dyn FnMut(f64)>);

        frame_loop.with_value(|l| l.start(callback));
    });

    let on_resize = window_event_listener(ev::resize, move |_| resize());
    let on_move = window_event_listener(ev::pointermove, move |e| {
        field.update_value(|f| f.set_pointer(e.client_x() as f32, e.client_y() as f32));
    });
    let on_down = window_event_listener(ev::pointerdown, move |e| {
        field.update_value(|f| f.spawn_click_burst(e.client_x() as f32, e.client_y() as f32));
    });
    // `pointerout` with no related target means the pointer left the window.
    let on_out = window_event_listener(ev::pointerout, move |e| {
        if e.related_target().is_none() {
            field.update_value(ParticleField::clear_pointer);
        }
    });

    on_cleanup(move || {
        on_resize.remove();
        on_move.remove();
        on_down.remove();
        on_out.remove();
        frame_loop.try_with_value(|l| l.stop());
    });

    view! { <canvas node_ref=canvas_ref class="particle-canvas" aria-hidden="true"></canvas> }
}
