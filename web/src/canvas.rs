use hocotate_core::{Coord2, Exportable};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement, HtmlImageElement};
use yew::NodeRef;

/// Side of a board cell in pixels.
pub(crate) const IMAGE_SIZE: f64 = 48.0;

pub(crate) fn load_image(src: &str) -> Option<HtmlImageElement> {
    match HtmlImageElement::new() {
        Ok(image) => {
            image.set_src(src);
            Some(image)
        }
        Err(err) => {
            log::error!("failed to create image for {}: {:?}", src, err);
            None
        }
    }
}

pub(crate) fn cell_origin((x, y): Coord2) -> (f64, f64) {
    (f64::from(x) * IMAGE_SIZE, f64::from(y) * IMAGE_SIZE)
}

fn log_js_error(what: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::error!("failed to {}: {:?}", what, err);
    }
}

/// Thin wrapper over the 2D context of a canvas node.
pub(crate) struct Painter {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl Painter {
    pub(crate) fn new(canvas: &NodeRef) -> Option<Self> {
        let canvas = canvas.cast::<HtmlCanvasElement>()?;
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            context,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        })
    }

    pub(crate) fn clear(&self) {
        self.context.clear_rect(0., 0., self.width, self.height);
    }

    /// Draws `image` over a whole cell, skipping images that haven't loaded (yet).
    pub(crate) fn cell_image(&self, image: &HtmlImageElement, coords: Coord2) {
        if !image.complete() || image.natural_width() == 0 {
            return;
        }
        let (x, y) = cell_origin(coords);
        log_js_error(
            "draw image",
            self.context
                .draw_image_with_html_image_element_and_dw_and_dh(image, x, y, IMAGE_SIZE, IMAGE_SIZE),
        );
    }

    pub(crate) fn text(&self, text: &str, font: &str, (x, y): (f64, f64)) {
        self.context.set_font(font);
        self.context.set_fill_style_str("black");
        log_js_error("draw text", self.context.fill_text(text, x, y));
    }

    pub(crate) fn cell_frame(&self, coords: Coord2, color: &str) {
        let (x, y) = cell_origin(coords);
        self.context.set_line_width(3.);
        self.context.set_stroke_style_str(color);
        self.context.stroke_rect(x, y, IMAGE_SIZE, IMAGE_SIZE);
    }
}

fn download_canvas(canvas: &HtmlCanvasElement, filename: &str) -> Result<(), JsValue> {
    let url = canvas.to_data_url()?;
    let anchor: HtmlAnchorElement = gloo::utils::document()
        .create_element("a")?
        .dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();
    Ok(())
}

/// Saves the canvas as a PNG named after the game's result.
pub(crate) fn save_canvas(canvas: &NodeRef, game: &impl Exportable) {
    let Some(filename) = game.export_filename() else {
        log::debug!("nothing to save yet");
        return;
    };
    let Some(canvas) = canvas.cast::<HtmlCanvasElement>() else {
        return;
    };

    log::debug!("saving {}", filename);
    if let Err(err) = download_canvas(&canvas, &filename) {
        log::error!("failed to save {}: {:?}", filename, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_origin_scales_by_image_size() {
        assert_eq!(cell_origin((0, 0)), (0., 0.));
        assert_eq!(cell_origin((2, 3)), (96., 144.));
        assert_eq!(cell_origin((9, 9)), (432., 432.));
    }
}
