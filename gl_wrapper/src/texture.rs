use std::ffi::c_void;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use png::{ColorType, Transformations};
use thiserror::Error;

/// Tightly packed RGBA8 pixels, first row at the bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Image {
    pub fn from_png<R: Read>(reader: R) -> Result<Self, TextureError> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;

        let channels = match info.color_type {
            ColorType::Grayscale => 1,
            ColorType::GrayscaleAlpha => 2,
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
            other => return Err(TextureError::UnsupportedColor(other)),
        };

        let mut data = Vec::with_capacity(info.width as usize * info.height as usize * 4);

        // GL expects the first row at the bottom
        for row in buf[..info.buffer_size()]
            .chunks_exact(info.line_size)
            .rev()
        {
            for px in row[..info.width as usize * channels].chunks_exact(channels) {
                let rgba = match px {
                    &[l] => [l, l, l, 255],
                    &[l, a] => [l, l, l, a],
                    &[r, g, b] => [r, g, b, 255],
                    &[r, g, b, a] => [r, g, b, a],
                    _ => unreachable!(),
                };
                data.extend_from_slice(&rgba);
            }
        }

        Ok(Self {
            width: info.width,
            height: info.height,
            data,
        })
    }
}

pub struct Texture2D {
    id: u32,
    width: u32,
    height: u32,
}

impl Texture2D {
    pub fn new(
        width: u32,
        height: u32,
        data: &[u8],
        filter: TextureFilter,
    ) -> Result<Self, TextureError> {
        if width as usize * height as usize * 4 != data.len() {
            return Err(TextureError::InvalidSrcLength);
        }

        let mut id = 0;

        unsafe {
            gl::GenTextures(1, &mut id);
            gl::BindTexture(gl::TEXTURE_2D, id);

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, filter.gl_filter());
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, filter.gl_filter());

            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                data.as_ptr() as *const c_void,
            );

            gl::BindTexture(gl::TEXTURE_2D, 0);
        }

        Ok(Self { id, width, height })
    }

    pub fn from_image(image: &Image, filter: TextureFilter) -> Result<Self, TextureError> {
        Self::new(image.width, image.height, &image.data, filter)
    }

    pub fn from_path<P: AsRef<Path>>(path: P, filter: TextureFilter) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TextureError::Io(path.to_owned(), e))?;

        let image = Image::from_png(BufReader::new(file))?;
        log::info!(
            "Loaded texture {path:?} ({}x{})",
            image.width,
            image.height
        );

        Self::from_image(&image, filter)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bind(&self, unit: u8) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit as u32);
            gl::BindTexture(gl::TEXTURE_2D, self.id)
        }
    }

    pub fn unbind(&self) {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, 0) }
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.id);
        }
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Invalid source data length")]
    InvalidSrcLength,
    #[error("Cannot open texture {0:?}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("Cannot decode PNG: {0}")]
    Decode(#[from] png::DecodingError),
    #[error("Unsupported PNG color type {0:?}")]
    UnsupportedColor(ColorType),
}

#[derive(Debug, Copy, Clone, Default)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
}

impl TextureFilter {
    fn gl_filter(&self) -> i32 {
        match self {
            TextureFilter::Nearest => gl::NEAREST as i32,
            TextureFilter::Linear => gl::LINEAR as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(width: u32, height: u32, color: ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn rgb_is_flipped_and_opaque() {
        #[rustfmt::skip]
        let png = encode(2, 2, ColorType::Rgb, &[
            1, 2, 3,    4, 5, 6,
            7, 8, 9,    10, 11, 12,
        ]);

        let image = Image::from_png(png.as_slice()).unwrap();

        #[rustfmt::skip]
        let expected = vec![
            7, 8, 9, 255,    10, 11, 12, 255,
            1, 2, 3, 255,    4, 5, 6, 255,
        ];

        assert_eq!((image.width, image.height), (2, 2));
        assert_eq!(image.data, expected);
    }

    #[test]
    fn grayscale_alpha_expands() {
        let png = encode(1, 1, ColorType::GrayscaleAlpha, &[100, 50]);

        let image = Image::from_png(png.as_slice()).unwrap();

        assert_eq!(image.data, vec![100, 100, 100, 50]);
    }

    #[test]
    fn garbage_is_decode_error() {
        let res = Image::from_png(&b"not a png"[..]);

        assert!(matches!(res, Err(TextureError::Decode(_))));
    }

    #[test]
    fn missing_file() {
        let res = Texture2D::from_path("missing.png", TextureFilter::Linear);

        assert!(matches!(res, Err(TextureError::Io(..))));
    }
}
