//! Image carriers as flat pixel byte streams.
//!
//! Pixels are flattened row-major, channel-minor, keeping the image's own
//! channel layout for 8-bit gray, gray+alpha, RGB and RGBA. Other layouts are
//! widened to RGBA8. Only lossless formats are written (PNG).

use std::path::{Path, PathBuf};

use image::{ColorType, DynamicImage, ImageBuffer, ImageFormat, Luma, LumaA, Rgb, Rgba};
use thiserror::Error;

/// Errors that can occur while reading or writing a carrier image.
#[derive(Error, Debug)]
pub enum PixelImageError {
    #[error("Image load error: {0}")]
    Load(String),

    #[error("Image save error: {0}")]
    Save(String),

    #[error("Pixel data does not match a {width}x{height} image with {channels} channels")]
    Layout {
        width: u32,
        height: u32,
        channels: u8,
    },
}

/// An image as a flat byte stream plus the shape needed to rebuild it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    channels: u8,
    bytes: Vec<u8>,
}

impl PixelImage {
    /// Loads an image file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PixelImageError> {
        let image = image::open(path).map_err(|e| PixelImageError::Load(e.to_string()))?;
        Ok(Self::from_dynamic(image))
    }

    /// Loads an image from encoded bytes.
    pub fn from_encoded(bytes: &[u8]) -> Result<Self, PixelImageError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| PixelImageError::Load(e.to_string()))?;
        Ok(Self::from_dynamic(image))
    }

    /// Flattens a decoded image.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let (channels, bytes) = match image.color() {
            ColorType::L8 => (1, image.into_bytes()),
            ColorType::La8 => (2, image.into_bytes()),
            ColorType::Rgb8 => (3, image.into_bytes()),
            ColorType::Rgba8 => (4, image.into_bytes()),
            _ => (4, image.to_rgba8().into_raw()),
        };
        Self {
            width,
            height,
            channels,
            bytes,
        }
    }

    /// Wraps raw pixel bytes, checking they fill the given shape.
    pub fn from_raw(width: u32, height: u32, channels: u8, bytes: Vec<u8>) -> Result<Self, PixelImageError> {
        let expected = width as usize * height as usize * channels as usize;
        if !(1..=4).contains(&channels) || bytes.len() != expected {
            return Err(PixelImageError::Layout {
                width,
                height,
                channels,
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            bytes,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// The flattened pixel bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable access for embedding; the length cannot change.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Rebuilds a `DynamicImage` with the original layout.
    pub fn to_dynamic(&self) -> Result<DynamicImage, PixelImageError> {
        let (w, h) = (self.width, self.height);
        let raw = self.bytes.clone();
        let image = match self.channels {
            1 => ImageBuffer::<Luma<u8>, _>::from_raw(w, h, raw).map(DynamicImage::ImageLuma8),
            2 => ImageBuffer::<LumaA<u8>, _>::from_raw(w, h, raw).map(DynamicImage::ImageLumaA8),
            3 => ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, raw).map(DynamicImage::ImageRgb8),
            4 => ImageBuffer::<Rgba<u8>, _>::from_raw(w, h, raw).map(DynamicImage::ImageRgba8),
            _ => None,
        };
        image.ok_or(PixelImageError::Layout {
            width: w,
            height: h,
            channels: self.channels,
        })
    }

    /// Saves the image as PNG.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PixelImageError> {
        self.to_dynamic()?
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| PixelImageError::Save(e.to_string()))
    }
}

/// Output path for a hidden image: `<stem>_hidden.png` next to the input.
pub fn hidden_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    path.with_file_name(format!("{}_hidden.png", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> PixelImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 17) % 256) as u8,
                ((y * 23) % 256) as u8,
                (((x + y) * 31) % 256) as u8,
            ])
        });
        PixelImage::from_dynamic(DynamicImage::ImageRgb8(img))
    }

    #[test]
    fn test_flatten_is_row_major_channel_minor() {
        let image = create_test_image(4, 3);
        assert_eq!(image.channels(), 3);
        assert_eq!(image.bytes().len(), 4 * 3 * 3);
        // Pixel (1, 0) starts at byte 3.
        assert_eq!(&image.bytes()[3..6], &[17, 0, 31]);
        // Pixel (0, 1) starts at byte 12.
        assert_eq!(&image.bytes()[12..15], &[0, 23, 31]);
    }

    #[test]
    fn test_png_roundtrip_keeps_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");

        let mut image = create_test_image(20, 10);
        image.bytes_mut()[0] ^= 1;
        image.save(&path).unwrap();

        let loaded = PixelImage::open(&path).unwrap();
        assert_eq!(loaded, image);
    }

    #[test]
    fn test_rgba_layout_kept() {
        let img = ImageBuffer::from_pixel(2, 2, Rgba([1u8, 2, 3, 4]));
        let image = PixelImage::from_dynamic(DynamicImage::ImageRgba8(img));
        assert_eq!(image.channels(), 4);
        assert_eq!(&image.bytes()[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(PixelImage::from_raw(2, 2, 3, vec![0; 12]).is_ok());
        assert!(matches!(
            PixelImage::from_raw(2, 2, 3, vec![0; 11]),
            Err(PixelImageError::Layout { .. })
        ));
        assert!(matches!(
            PixelImage::from_raw(1, 1, 5, vec![0; 5]),
            Err(PixelImageError::Layout { .. })
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = PixelImage::open(dir.path().join("nope.png"));
        assert!(matches!(result, Err(PixelImageError::Load(_))));
    }

    #[test]
    fn test_hidden_path() {
        assert_eq!(
            hidden_path("/tmp/icons/lock.png"),
            PathBuf::from("/tmp/icons/lock_hidden.png")
        );
        assert_eq!(hidden_path("photo.bmp"), PathBuf::from("photo_hidden.png"));
    }
}
