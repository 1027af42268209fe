//! Raster data-URL encoding and the cropper's source image.
//!
//! Everything rendered inside the exportable preview must be
//! self-contained: an SVG captured as an image (see `capture`) cannot
//! fetch external or `blob:` resources, so raster data travels as data
//! URLs instead of object URLs throughout the app.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::RgbaImage;
use mailmock_core::crop::{self, CropError, Dimensions, PixelRect};

/// Build a data URL for raw encoded image bytes.
#[must_use]
pub fn bytes_to_data_url(bytes: &[u8], mime_type: &str) -> String {
    format!("data:{mime_type};base64,{}", BASE64.encode(bytes))
}

/// Guess the MIME type of encoded raster bytes from their magic number.
///
/// Falls back to `application/octet-stream` for anything unrecognized;
/// browsers still sniff data-URL payloads themselves, so the fallback
/// only loses the type hint.
#[must_use]
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'B', b'M', ..] => "image/bmp",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "application/octet-stream",
    }
}

/// An uploaded image staged for cropping.
///
/// Holds the decoded pixels (for the committed crop) alongside a data
/// URL of the original upload (for display in the cropper dialog).
#[derive(Debug, Clone)]
pub struct CropSource {
    /// Decoded source pixels at native resolution.
    pub image: RgbaImage,
    /// The upload as a data URL, for the dialog's `<img src>`.
    pub data_url: String,
}

impl CropSource {
    /// Stage uploaded bytes: decode them and build the display URL.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::EmptyInput`] or [`CropError::Decode`] when
    /// the upload is not a usable raster image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CropError> {
        let image = crop::decode_image(bytes)?;
        let data_url = bytes_to_data_url(bytes, sniff_mime(bytes));
        Ok(Self { image, data_url })
    }

    /// Native dimensions of the uploaded image.
    #[must_use]
    pub fn natural(&self) -> Dimensions {
        let (width, height) = self.image.dimensions();
        Dimensions { width, height }
    }
}

/// Commit a crop: copy the selected square out of the source and encode
/// it as a JPEG data URL for the avatar.
///
/// # Errors
///
/// Returns [`CropError::OutOfBounds`] for a selection outside the
/// image and [`CropError::Encode`] if JPEG encoding fails.
pub fn cropped_data_url(image: &RgbaImage, rect: PixelRect) -> Result<String, CropError> {
    let cropped = crop::crop_square(image, rect)?;
    let jpeg = crop::encode_jpeg(&cropped)?;
    Ok(bytes_to_data_url(&jpeg, "image/jpeg"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn small_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(8, 6, image::Rgba([10, 20, 30, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn sniffs_common_formats() {
        assert_eq!(sniff_mime(&small_png()), "image/png");
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_mime(b"GIF89a"), "image/gif");
        assert_eq!(sniff_mime(b"BM0000"), "image/bmp");
        assert_eq!(sniff_mime(b"RIFF\x00\x00\x00\x00WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime(b"plain text"), "application/octet-stream");
        assert_eq!(sniff_mime(&[]), "application/octet-stream");
    }

    #[test]
    fn data_url_carries_mime_and_base64_payload() {
        let url = bytes_to_data_url(&[1, 2, 3], "image/png");
        assert_eq!(url, "data:image/png;base64,AQID");
    }

    #[test]
    fn crop_source_decodes_upload() {
        let source = CropSource::from_bytes(&small_png()).unwrap();
        assert_eq!(
            source.natural(),
            Dimensions {
                width: 8,
                height: 6
            }
        );
        assert!(source.data_url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn crop_source_rejects_garbage() {
        assert!(CropSource::from_bytes(&[0x00, 0x01]).is_err());
        assert!(CropSource::from_bytes(&[]).is_err());
    }

    #[test]
    fn committed_crop_is_a_jpeg_data_url() {
        let source = CropSource::from_bytes(&small_png()).unwrap();
        let url = cropped_data_url(
            &source.image,
            PixelRect {
                x: 1,
                y: 1,
                side: 4,
            },
        )
        .unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }
}
