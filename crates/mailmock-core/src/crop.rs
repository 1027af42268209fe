//! Crop-selection geometry and the 1:1 pixel crop.
//!
//! The cropper UI works in two coordinate spaces: the *display box*
//! (the source image scaled to fit the dialog viewport) and the
//! *natural* pixel space of the source image.  [`CropRect`] stores the
//! selection as percentages of the display box so it survives viewport
//! changes; drag and resize interactions arrive as display-pixel
//! deltas.  Committing resolves the selection into a [`PixelRect`] in
//! natural space and copies exactly that region into a square buffer.
//!
//! The square aspect is structural: every resize recomputes both
//! percentage dimensions from a single side length, and [`PixelRect`]
//! carries one `side` field, so width and height cannot diverge.

use image::RgbaImage;

/// Image or viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Fraction of the shorter image dimension covered by the initial
/// selection.
pub const DEFAULT_COVERAGE: f64 = 0.9;

/// Smallest selection side in display pixels; keeps the resize handle
/// grabbable.
pub const MIN_SIDE_PX: f64 = 16.0;

/// JPEG quality used when encoding the committed crop.
pub const CROP_JPEG_QUALITY: u8 = 95;

/// Errors from decoding, cropping, or encoding the source image.
#[derive(Debug, thiserror::Error)]
pub enum CropError {
    /// The uploaded file was empty.
    #[error("empty image input")]
    EmptyInput,

    /// The uploaded bytes are not a decodable raster image.
    #[error("image decode failed: {0}")]
    Decode(String),

    /// The selection does not lie within the source image.
    #[error("selection {side}px at ({x}, {y}) exceeds {width}x{height} image")]
    OutOfBounds {
        /// Selection origin, natural pixels.
        x: u32,
        /// Selection origin, natural pixels.
        y: u32,
        /// Selection side, natural pixels.
        side: u32,
        /// Source image width.
        width: u32,
        /// Source image height.
        height: u32,
    },

    /// JPEG encoding of the cropped region failed.
    #[error("JPEG encoding failed: {0}")]
    Encode(String),
}

/// A square crop selection, stored as percentages of the display box.
///
/// `width` and `height` differ as percentages whenever the display box
/// is not square, but always describe the same number of display
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    /// Left edge, percent of display width.
    pub x: f64,
    /// Top edge, percent of display height.
    pub y: f64,
    /// Width, percent of display width.
    pub width: f64,
    /// Height, percent of display height.
    pub height: f64,
}

impl CropRect {
    /// The initial selection for a freshly loaded image: a centered
    /// square covering [`DEFAULT_COVERAGE`] of the shorter dimension.
    #[must_use]
    pub fn initial(display: Dimensions) -> Self {
        let dw = f64::from(display.width);
        let dh = f64::from(display.height);
        if dw < 1.0 || dh < 1.0 {
            return Self {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            };
        }
        let side = DEFAULT_COVERAGE * dw.min(dh);
        Self {
            x: (dw - side) / 2.0 / dw * 100.0,
            y: (dh - side) / 2.0 / dh * 100.0,
            width: side / dw * 100.0,
            height: side / dh * 100.0,
        }
    }

    /// Selection geometry in display pixels: `(x, y, side)`.
    #[must_use]
    pub fn display_px(&self, display: Dimensions) -> (f64, f64, f64) {
        let dw = f64::from(display.width);
        let dh = f64::from(display.height);
        (
            self.x / 100.0 * dw,
            self.y / 100.0 * dh,
            self.width / 100.0 * dw,
        )
    }

    /// Translate the selection by a display-pixel delta, clamped so it
    /// stays inside the display box.
    #[must_use]
    pub fn dragged(self, dx: f64, dy: f64, display: Dimensions) -> Self {
        let (x, y, side) = self.display_px(display);
        Self::from_display_px(x + dx, y + dy, side, display)
    }

    /// Grow or shrink the selection from its bottom-right handle by a
    /// display-pixel delta.  Both dimensions are recomputed from the new
    /// side length; the result is clamped to the display box and to
    /// [`MIN_SIDE_PX`].
    #[must_use]
    pub fn resized(self, delta: f64, display: Dimensions) -> Self {
        let (x, y, side) = self.display_px(display);
        Self::from_display_px(x, y, side + delta, display)
    }

    /// Build a clamped percent-space selection from display-pixel
    /// geometry.
    #[must_use]
    fn from_display_px(x: f64, y: f64, side: f64, display: Dimensions) -> Self {
        let dw = f64::from(display.width);
        let dh = f64::from(display.height);
        if dw < 1.0 || dh < 1.0 {
            return Self {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            };
        }
        // Side first: never larger than the box, never below the
        // minimum (unless the box itself is smaller).
        let max_side = dw.min(dh);
        let side = side.clamp(MIN_SIDE_PX.min(max_side), max_side);
        // Then origin: keep the whole square inside.
        let x = x.clamp(0.0, dw - side);
        let y = y.clamp(0.0, dh - side);
        Self {
            x: x / dw * 100.0,
            y: y / dh * 100.0,
            width: side / dw * 100.0,
            height: side / dh * 100.0,
        }
    }
}

/// A committed square crop region in natural (source-image) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge in source pixels.
    pub x: u32,
    /// Top edge in source pixels.
    pub y: u32,
    /// Side length in source pixels; the region is always square.
    pub side: u32,
}

/// Scale `natural` to fit within `bounds`, preserving aspect ratio and
/// never upscaling.
#[must_use]
pub fn fit_within(natural: Dimensions, bounds: Dimensions) -> Dimensions {
    let nw = f64::from(natural.width);
    let nh = f64::from(natural.height);
    if nw < 1.0 || nh < 1.0 {
        return natural;
    }
    let scale = (f64::from(bounds.width) / nw)
        .min(f64::from(bounds.height) / nh)
        .min(1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let fitted = Dimensions {
        width: ((nw * scale).round() as u32).max(1),
        height: ((nh * scale).round() as u32).max(1),
    };
    fitted
}

/// Resolve a percent-space selection into natural pixel space,
/// accounting for the ratio between the display box and the image's
/// native size.
///
/// Returns `None` when either box is degenerate (zero-sized display or
/// image), which can only arise before an image has loaded.
#[must_use]
pub fn resolve(rect: CropRect, display: Dimensions, natural: Dimensions) -> Option<PixelRect> {
    if display.width == 0 || display.height == 0 || natural.width == 0 || natural.height == 0 {
        return None;
    }
    let (x, y, side) = rect.display_px(display);
    let scale_x = f64::from(natural.width) / f64::from(display.width);
    let scale_y = f64::from(natural.height) / f64::from(display.height);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let px = ((x * scale_x).round().max(0.0) as u32).min(natural.width.saturating_sub(1));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let py = ((y * scale_y).round().max(0.0) as u32).min(natural.height.saturating_sub(1));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let side = (side * scale_x).round().max(1.0) as u32;

    // Clamp the side so the square stays inside the image even after
    // rounding.
    let side = side.min(natural.width - px).min(natural.height - py);
    if side == 0 {
        return None;
    }
    Some(PixelRect { x: px, y: py, side })
}

/// Decode uploaded bytes into an RGBA image.
///
/// # Errors
///
/// Returns [`CropError::EmptyInput`] for an empty upload and
/// [`CropError::Decode`] when the bytes are not a recognizable raster
/// format.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, CropError> {
    if bytes.is_empty() {
        return Err(CropError::EmptyInput);
    }
    let decoded = image::load_from_memory(bytes).map_err(|e| CropError::Decode(e.to_string()))?;
    Ok(decoded.to_rgba8())
}

/// Copy the selected region out of the source image, 1:1, into a new
/// square buffer at native resolution.
///
/// # Errors
///
/// Returns [`CropError::OutOfBounds`] if the region does not lie fully
/// within the image.
pub fn crop_square(image: &RgbaImage, rect: PixelRect) -> Result<RgbaImage, CropError> {
    let (width, height) = image.dimensions();
    let within = rect
        .x
        .checked_add(rect.side)
        .is_some_and(|right| right <= width)
        && rect
            .y
            .checked_add(rect.side)
            .is_some_and(|bottom| bottom <= height);
    if !within || rect.side == 0 {
        return Err(CropError::OutOfBounds {
            x: rect.x,
            y: rect.y,
            side: rect.side,
            width,
            height,
        });
    }
    Ok(image::imageops::crop_imm(image, rect.x, rect.y, rect.side, rect.side).to_image())
}

/// Encode a cropped region as JPEG at [`CROP_JPEG_QUALITY`].
///
/// JPEG has no alpha channel, so the buffer is flattened to RGB first.
///
/// # Errors
///
/// Returns [`CropError::Encode`] if the encoder fails.
pub fn encode_jpeg(image: &RgbaImage) -> Result<Vec<u8>, CropError> {
    let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut bytes = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, CROP_JPEG_QUALITY);
    image::ImageEncoder::write_image(
        encoder,
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        image::ExtendedColorType::Rgb8,
    )
    .map_err(|e| CropError::Encode(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Side length of a selection in display pixels, measured through
    /// the width and through the height independently.
    fn sides_px(rect: CropRect, display: Dimensions) -> (f64, f64) {
        (
            rect.width / 100.0 * f64::from(display.width),
            rect.height / 100.0 * f64::from(display.height),
        )
    }

    #[allow(clippy::cast_possible_truncation)]
    fn gradient_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 7, 255])
        })
    }

    #[test]
    fn initial_selection_covers_shorter_dimension() {
        let display = Dimensions {
            width: 400,
            height: 300,
        };
        let rect = CropRect::initial(display);
        let (x, y, side) = rect.display_px(display);
        assert!((side - 270.0).abs() < 1e-9, "side {side}");
        assert!((x - 65.0).abs() < 1e-9, "x {x}");
        assert!((y - 15.0).abs() < 1e-9, "y {y}");
    }

    #[test]
    fn selection_stays_square_through_interaction() {
        let display = Dimensions {
            width: 500,
            height: 320,
        };
        let mut rect = CropRect::initial(display);
        let moves: [(f64, f64); 4] = [(30.0, -200.0), (-999.0, 14.0), (250.0, 250.0), (0.1, 0.0)];
        let resizes: [f64; 4] = [40.0, -500.0, 9999.0, -3.5];
        for ((dx, dy), delta) in moves.iter().zip(resizes) {
            rect = rect.dragged(*dx, *dy, display);
            rect = rect.resized(delta, display);
            let (via_width, via_height) = sides_px(rect, display);
            assert!(
                (via_width - via_height).abs() < 1e-6,
                "aspect drifted: {via_width} vs {via_height}"
            );
        }
    }

    #[test]
    fn selection_stays_in_bounds_through_interaction() {
        let display = Dimensions {
            width: 300,
            height: 200,
        };
        let natural = Dimensions {
            width: 1200,
            height: 800,
        };
        let mut rect = CropRect::initial(display);
        for (dx, dy, delta) in [
            (1e4, 1e4, 1e4),
            (-1e4, -1e4, -1e4),
            (117.0, -43.0, 55.0),
            (-9.0, 999.0, -999.0),
        ] {
            rect = rect.dragged(dx, dy, display).resized(delta, display);
            let px = resolve(rect, display, natural).unwrap();
            assert!(px.x + px.side <= natural.width, "x overflow: {px:?}");
            assert!(px.y + px.side <= natural.height, "y overflow: {px:?}");
        }
    }

    #[test]
    fn resize_respects_minimum_side() {
        let display = Dimensions {
            width: 300,
            height: 200,
        };
        let rect = CropRect::initial(display).resized(-1e6, display);
        let (side, _) = sides_px(rect, display);
        assert!((side - MIN_SIDE_PX).abs() < 1e-9, "side {side}");
    }

    #[test]
    fn resolve_scales_between_display_and_natural_space() {
        // Natural 400x300 shown at half size: the 135px display square
        // resolves to 270 native pixels.
        let display = Dimensions {
            width: 200,
            height: 150,
        };
        let natural = Dimensions {
            width: 400,
            height: 300,
        };
        let rect = CropRect::initial(display);
        let px = resolve(rect, display, natural).unwrap();
        assert_eq!(px, PixelRect { x: 65, y: 15, side: 270 });
    }

    #[test]
    fn resolve_rejects_degenerate_boxes() {
        let rect = CropRect::initial(Dimensions {
            width: 100,
            height: 100,
        });
        assert!(
            resolve(
                rect,
                Dimensions {
                    width: 0,
                    height: 0
                },
                Dimensions {
                    width: 100,
                    height: 100
                },
            )
            .is_none()
        );
    }

    #[test]
    fn default_crop_of_400x300_upload_is_270_square() {
        // Display box is the natural size (400x300 fits the viewport),
        // the default selection is 90% of 300 = 270, centered, and
        // applying it untouched produces exactly 270x270 pixels.
        let natural = Dimensions {
            width: 400,
            height: 300,
        };
        let display = fit_within(
            natural,
            Dimensions {
                width: 560,
                height: 384,
            },
        );
        assert_eq!(display, natural);

        let rect = CropRect::initial(display);
        let px = resolve(rect, display, natural).unwrap();
        assert_eq!(px, PixelRect { x: 65, y: 15, side: 270 });

        let source = gradient_image(400, 300);
        let cropped = crop_square(&source, px).unwrap();
        assert_eq!(cropped.dimensions(), (270, 270));
    }

    #[test]
    fn crop_copies_pixels_one_to_one() {
        let source = gradient_image(100, 80);
        let rect = PixelRect {
            x: 10,
            y: 20,
            side: 40,
        };
        let cropped = crop_square(&source, rect).unwrap();
        assert_eq!(cropped.get_pixel(0, 0), source.get_pixel(10, 20));
        assert_eq!(cropped.get_pixel(39, 39), source.get_pixel(49, 59));
    }

    #[test]
    fn crop_rejects_out_of_bounds_region() {
        let source = gradient_image(50, 50);
        let result = crop_square(
            &source,
            PixelRect {
                x: 30,
                y: 30,
                side: 30,
            },
        );
        assert!(matches!(result, Err(CropError::OutOfBounds { .. })));
    }

    #[test]
    fn fit_within_never_upscales() {
        let natural = Dimensions {
            width: 100,
            height: 60,
        };
        let fitted = fit_within(
            natural,
            Dimensions {
                width: 1000,
                height: 1000,
            },
        );
        assert_eq!(fitted, natural);
    }

    #[test]
    fn fit_within_preserves_aspect() {
        let fitted = fit_within(
            Dimensions {
                width: 1600,
                height: 1200,
            },
            Dimensions {
                width: 560,
                height: 384,
            },
        );
        assert_eq!(
            fitted,
            Dimensions {
                width: 512,
                height: 384
            }
        );
    }

    #[test]
    fn decode_rejects_empty_and_corrupt_input() {
        assert!(matches!(decode_image(&[]), Err(CropError::EmptyInput)));
        assert!(matches!(
            decode_image(&[0xFF, 0x00, 0x01]),
            Err(CropError::Decode(_))
        ));
    }

    #[test]
    fn decode_round_trips_a_png() {
        let source = gradient_image(32, 24);
        let mut png = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png);
        image::ImageEncoder::write_image(
            encoder,
            source.as_raw(),
            source.width(),
            source.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();

        let decoded = decode_image(&png).unwrap();
        assert_eq!(decoded.dimensions(), (32, 24));
        assert_eq!(decoded.get_pixel(5, 6), source.get_pixel(5, 6));
    }

    #[test]
    fn encode_jpeg_produces_jfif_bytes() {
        let cropped = gradient_image(64, 64);
        let bytes = encode_jpeg(&cropped).unwrap();
        // JPEG SOI marker.
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
