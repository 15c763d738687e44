//! PNG encoding of RGBA buffers.

use thiserror::Error;

/// PNG encoding errors.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

/// Encode an 8-bit RGBA buffer as PNG.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    let expected = width as usize * height as usize * 4;
    if rgba_data.len() != expected {
        return Err(EncodeError::BufferSize {
            width,
            height,
            expected,
            actual: rgba_data.len(),
        });
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
    }
    Ok(png_data)
}
