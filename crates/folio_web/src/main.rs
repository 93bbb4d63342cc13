// Trunk builds this binary for the browser; `wasm_start` mounts the page.
// On a native target there is nothing to run.

fn main() {}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    folio_web::start();
}
