//! Image header inspection

use image::ImageReader;
use stash_core::types::Dimensions;
use stash_core::{Error, Result};
use std::io::Cursor;

/// Read the pixel dimensions of an encoded image without decoding its pixels.
pub fn read_dimensions(data: &[u8]) -> Result<Dimensions> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| Error::ImageDecode(format!("failed to guess format: {e}")))?;

    if reader.format().is_none() {
        return Err(Error::ImageDecode("unrecognized image format".into()));
    }

    reader
        .into_dimensions()
        .map(Dimensions::from)
        .map_err(|e| Error::ImageDecode(e.to_string()))
}
