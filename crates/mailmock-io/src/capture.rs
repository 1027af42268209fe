//! DOM subtree capture to a supersampled PNG.
//!
//! Reproduces the rendered appearance of a live element outside the
//! document: the subtree is deep-cloned with every node's computed
//! style inlined, serialized into an SVG `<foreignObject>` wrapper,
//! rasterized through an offscreen canvas at a multiple of the rendered
//! size over an opaque white background, and read back as PNG bytes.
//!
//! Constraint: raster resources inside the subtree must be data URLs.
//! An SVG loaded as an `<img>` cannot fetch external or `blob:`
//! resources, so anything else would come out blank in the capture
//! (the rest of the app encodes avatars as data URLs for this reason;
//! see `raster`).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use mailmock_core::Dimensions;
use mailmock_core::export::supersampled;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::UnwrapThrowExt;
use wasm_bindgen::prelude::Closure;

/// Errors that can occur while capturing a subtree.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The element has no rendered extent (zero width or height).
    #[error("subtree has zero rendered size")]
    EmptySubtree,

    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),

    /// The canvas PNG readback was not in the expected format.
    #[error("PNG readback failed: {0}")]
    PngReadback(String),
}

impl From<JsValue> for CaptureError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Rasterize a live, rendered DOM subtree into PNG bytes at `scale`
/// times its rendered size.
///
/// The layout is scaled uniformly, anchored at the top-left corner, and
/// composited over opaque white regardless of the page background: the
/// artifact is meant to be viewed outside any page context.
///
/// # Errors
///
/// Returns [`CaptureError::EmptySubtree`] for an unrendered element,
/// [`CaptureError::JsError`] if cloning, serialization, image load, or
/// canvas drawing fails, and [`CaptureError::PngReadback`] if the
/// canvas yields an unexpected data URL.
#[allow(clippy::future_not_send)] // WASM is single-threaded; DOM types are !Send
pub async fn capture_element_png(
    element: &web_sys::Element,
    scale: u32,
) -> Result<Vec<u8>, CaptureError> {
    let window =
        web_sys::window().ok_or_else(|| CaptureError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| CaptureError::JsError("no document".into()))?;

    let rendered = rendered_dimensions(element)?;
    let target = supersampled(rendered, scale);

    // 1. Clone the subtree and freeze its appearance by inlining
    //    computed styles; the clone renders identically without the
    //    page's stylesheets.
    let clone = clone_with_styles(&window, element)?;
    clone.set_attribute("xmlns", "http://www.w3.org/1999/xhtml")?;

    // 2. Serialize into an SVG wrapper at the rendered size.
    let serializer = web_sys::XmlSerializer::new()?;
    let markup = serializer.serialize_to_string(&clone)?;
    let svg = foreign_object_svg(&markup, rendered);

    // 3. Rasterize the SVG by loading it as an image.
    let image = load_svg_image(&svg).await?;

    // 4. Paint at scale over opaque white.
    let canvas: web_sys::HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| CaptureError::JsError("canvas element cast failed".into()))?;
    canvas.set_width(target.width);
    canvas.set_height(target.height);
    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| CaptureError::JsError("no 2d canvas context".into()))?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()
        .map_err(|_| CaptureError::JsError("2d context cast failed".into()))?;
    context.set_fill_style_str("#ffffff");
    context.fill_rect(0.0, 0.0, f64::from(target.width), f64::from(target.height));
    context.scale(f64::from(scale), f64::from(scale))?;
    context.draw_image_with_html_image_element(&image, 0.0, 0.0)?;

    // 5. PNG readback.
    let data_url = canvas.to_data_url_with_type("image/png")?;
    let payload = data_url
        .strip_prefix("data:image/png;base64,")
        .ok_or_else(|| CaptureError::PngReadback("unexpected data URL prefix".into()))?;
    BASE64
        .decode(payload)
        .map_err(|e| CaptureError::PngReadback(e.to_string()))
}

/// Measure the rendered extent of the subtree.
fn rendered_dimensions(element: &web_sys::Element) -> Result<Dimensions, CaptureError> {
    let width = u32::try_from(element.scroll_width()).unwrap_or(0);
    let height = u32::try_from(element.scroll_height()).unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(CaptureError::EmptySubtree);
    }
    Ok(Dimensions { width, height })
}

/// Wrap serialized XHTML markup in an SVG `<foreignObject>` document of
/// the given size.
fn foreign_object_svg(markup: &str, size: Dimensions) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}">"#,
            r#"<foreignObject x="0" y="0" width="100%" height="100%">{markup}</foreignObject>"#,
            "</svg>",
        ),
        w = size.width,
        h = size.height,
        markup = markup,
    )
}

/// Deep-clone an element and copy computed styles onto the clone,
/// node for node.
fn clone_with_styles(
    window: &web_sys::Window,
    root: &web_sys::Element,
) -> Result<web_sys::Element, CaptureError> {
    let clone = root
        .clone_node_with_deep(true)?
        .dyn_into::<web_sys::Element>()
        .map_err(|_| CaptureError::JsError("cloned node is not an element".into()))?;
    inline_styles(window, root, &clone)?;
    Ok(clone)
}

/// Recursively copy the computed style of each live node onto the
/// corresponding cloned node as inline `cssText`.
///
/// The two trees are walked in lockstep; `cloneNode(true)` guarantees
/// matching shapes, but the zip over `min(len, len)` keeps a mismatch
/// from panicking regardless.
fn inline_styles(
    window: &web_sys::Window,
    source: &web_sys::Element,
    target: &web_sys::Element,
) -> Result<(), CaptureError> {
    if let Some(computed) = window.get_computed_style(source)?
        && let Some(html) = target.dyn_ref::<web_sys::HtmlElement>()
    {
        let mut css = String::new();
        for i in 0..computed.length() {
            let name = computed.item(i);
            let value = computed.get_property_value(&name)?;
            css.push_str(&name);
            css.push_str(": ");
            css.push_str(&value);
            css.push_str("; ");
        }
        html.style().set_css_text(&css);
    }

    let source_children = source.children();
    let target_children = target.children();
    for i in 0..source_children.length().min(target_children.length()) {
        if let (Some(source_child), Some(target_child)) =
            (source_children.item(i), target_children.item(i))
        {
            inline_styles(window, &source_child, &target_child)?;
        }
    }
    Ok(())
}

/// Load an SVG document as an `HtmlImageElement` via a data URL,
/// resolving once the browser has rasterized it.
#[allow(clippy::future_not_send)] // WASM is single-threaded; DOM types are !Send
async fn load_svg_image(svg: &str) -> Result<web_sys::HtmlImageElement, CaptureError> {
    let encoded: String = js_sys::encode_uri_component(svg).into();
    let url = format!("data:image/svg+xml;charset=utf-8,{encoded}");

    let image = web_sys::HtmlImageElement::new()?;
    let (promise, resolve, reject) = new_promise();

    let onload = Closure::<dyn FnMut()>::new(move || {
        resolve.call0(&JsValue::NULL).ok();
    });
    let onerror = Closure::<dyn FnMut()>::new(move || {
        reject
            .call1(&JsValue::NULL, &JsValue::from_str("SVG image failed to load"))
            .ok();
    });
    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    image.set_src(&url);

    // Keep the closures alive while we await the load.
    let result = wasm_bindgen_futures::JsFuture::from(promise).await;
    image.set_onload(None);
    image.set_onerror(None);
    drop(onload);
    drop(onerror);

    match result {
        Ok(_) => Ok(image),
        Err(e) => Err(CaptureError::JsError(
            e.as_string().unwrap_or_else(|| format!("{e:?}")),
        )),
    }
}

/// Create a JS Promise along with its resolve and reject functions.
fn new_promise() -> (js_sys::Promise, js_sys::Function, js_sys::Function) {
    use std::cell::RefCell;
    use std::rc::Rc;

    let resolve = Rc::new(RefCell::new(None::<js_sys::Function>));
    let reject = Rc::new(RefCell::new(None::<js_sys::Function>));
    let resolve_clone = Rc::clone(&resolve);
    let reject_clone = Rc::clone(&reject);

    let promise = js_sys::Promise::new(&mut move |res, rej| {
        *resolve_clone.borrow_mut() = Some(res);
        *reject_clone.borrow_mut() = Some(rej);
    });

    let resolve_fn = resolve
        .borrow_mut()
        .take()
        .expect_throw("resolve not captured");
    let reject_fn = reject
        .borrow_mut()
        .take()
        .expect_throw("reject not captured");

    (promise, resolve_fn, reject_fn)
}
