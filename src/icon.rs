/*!
 * Item icon decoding
 *
 * Icons are stored inside the `icon` field as base64-encoded image files
 * (usually BMP). Decoding never fails a record: callers log the error and
 * treat the icon as absent.
 */

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Errors that can occur while decoding or saving an icon
#[derive(Error, Debug)]
pub enum IconError {
    /// Payload contained no data
    #[error("image payload is empty")]
    Empty,

    /// Payload is not valid base64
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Bytes are not a supported image
    #[error("invalid image data: {0}")]
    Image(#[from] image::ImageError),
}

/// A decoded item icon
#[derive(Debug, Clone)]
pub struct Icon {
    /// Format detected from the payload, when recognizable
    pub format: Option<ImageFormat>,
    /// Decoded pixels
    pub image: DynamicImage,
}

impl Icon {
    /// Decode a base64 payload into an icon.
    ///
    /// Whitespace inside the payload is ignored, since exports commonly
    /// wrap long base64 strings across lines.
    pub fn from_base64(payload: &str) -> Result<Self, IconError> {
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(IconError::Empty);
        }

        let bytes = STANDARD.decode(compact.as_bytes())?;
        Self::from_bytes(&bytes)
    }

    /// Decode raw image file bytes into an icon
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IconError> {
        if bytes.is_empty() {
            return Err(IconError::Empty);
        }
        let format = image::guess_format(bytes).ok();
        let image = image::load_from_memory(bytes)?;
        Ok(Self { format, image })
    }

    /// Icon width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Icon height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Write the icon to disk. The format follows the path's extension.
    pub fn save(&self, path: &Path) -> Result<(), IconError> {
        self.image.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    use image::{Rgba, RgbaImage};

    /// Encode a small solid image as base64 in the given format
    pub(crate) fn encoded_icon(format: ImageFormat) -> String {
        let pixels = RgbaImage::from_pixel(4, 3, Rgba([200, 40, 40, 255]));
        let image = DynamicImage::ImageRgba8(pixels);
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, format).unwrap();
        STANDARD.encode(buf.into_inner())
    }

    #[test]
    fn test_decode_png() {
        let icon = Icon::from_base64(&encoded_icon(ImageFormat::Png)).unwrap();
        assert_eq!(icon.format, Some(ImageFormat::Png));
        assert_eq!((icon.width(), icon.height()), (4, 3));
    }

    #[test]
    fn test_decode_bmp_with_line_breaks() {
        let encoded = encoded_icon(ImageFormat::Bmp);
        let wrapped: String = encoded
            .as_bytes()
            .chunks(16)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n  ");

        let icon = Icon::from_base64(&wrapped).unwrap();
        assert_eq!(icon.format, Some(ImageFormat::Bmp));
        assert_eq!(icon.width(), 4);
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(Icon::from_base64("  "), Err(IconError::Empty)));
        assert!(matches!(
            Icon::from_base64("not*base64!"),
            Err(IconError::Base64(_))
        ));
        // Valid base64, but not an image
        let text = STANDARD.encode(b"hello there");
        assert!(matches!(Icon::from_base64(&text), Err(IconError::Image(_))));
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        let icon = Icon::from_base64(&encoded_icon(ImageFormat::Png)).unwrap();
        icon.save(&path).unwrap();

        let reloaded = Icon::from_bytes(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(reloaded.width(), 4);
    }
}
