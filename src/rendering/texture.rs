use crate::io::common::error::AssetError;
use image::RgbaImage;
use image::imageops::FilterType;
use std::fmt::{Debug, Formatter};

#[derive(Clone, PartialEq, Eq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Debug for Texture {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ width: {}, height: {}, ", self.width, self.height)?;
        write!(f, "rgba: [{}] }}", self.rgba.len())
    }
}

impl Texture {
    pub fn decode(path: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let image = image::load_from_memory(bytes)
            .map_err(|source| AssetError::Decode {
                path: path.to_string(),
                source,
            })?
            .to_rgba8();

        Ok(Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    /// What is rendered while the actual image is still being downloaded.
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![0x80, 0x80, 0x80, 0x00],
        }
    }

    pub fn scaled(&self, width: u32, height: u32) -> Texture {
        if width == self.width && height == self.height {
            return self.clone();
        }

        let Some(source) = RgbaImage::from_raw(self.width, self.height, self.rgba.clone()) else {
            // rgba doesn't cover width * height, nothing sensible to scale.
            return self.clone();
        };

        let resized = image::imageops::resize(&source, width, height, FilterType::Triangle);
        Texture {
            width,
            height,
            rgba: resized.into_raw(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::io::common::error::AssetError;
    use crate::rendering::texture::Texture;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    pub fn decodes_png() {
        let texture = Texture::decode("images/bg.png", &png_bytes(3, 2)).unwrap();
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(texture.rgba.len(), 3 * 2 * 4);
        assert_eq!(&texture.rgba[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    pub fn garbage_is_a_decode_error() {
        let result = Texture::decode("images/bg.png", b"definitely not a png");
        assert!(matches!(result, Err(AssetError::Decode { path, .. }) if path == "images/bg.png"));
    }

    #[test]
    pub fn scales_to_requested_size() {
        let texture = Texture::decode("images/bg.png", &png_bytes(4, 4)).unwrap();
        let scaled = texture.scaled(2, 1);
        assert_eq!((scaled.width, scaled.height), (2, 1));
        assert_eq!(scaled.rgba.len(), 2 * 4);
    }
}
