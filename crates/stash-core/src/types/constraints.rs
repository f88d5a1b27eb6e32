//! Image and file-size constraints for uploads

use serde::{Deserialize, Serialize};

use crate::error::ConstraintViolation;

/// Optional bounds an uploaded image must satisfy.
///
/// A missing bound, or a bound of zero, leaves that dimension unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size_kb: Option<u64>,
}

impl ImageConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_width(mut self, width: u32) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_min_height(mut self, height: u32) -> Self {
        self.min_height = Some(height);
        self
    }

    pub fn with_max_height(mut self, height: u32) -> Self {
        self.max_height = Some(height);
        self
    }

    pub fn with_max_file_size_kb(mut self, kb: u64) -> Self {
        self.max_file_size_kb = Some(kb);
        self
    }

    /// Check an image against these constraints.
    ///
    /// Bounds are checked in a fixed order (min width, max width, min height,
    /// max height, file size) and the first violation is returned. Values equal
    /// to a bound pass.
    pub fn validate(
        &self,
        dimensions: Dimensions,
        file_size_bytes: u64,
    ) -> Result<(), ConstraintViolation> {
        if let Some(min) = bound(self.min_width) {
            if dimensions.width < min {
                return Err(ConstraintViolation::WidthTooSmall);
            }
        }
        if let Some(max) = bound(self.max_width) {
            if dimensions.width > max {
                return Err(ConstraintViolation::WidthTooLarge);
            }
        }
        if let Some(min) = bound(self.min_height) {
            if dimensions.height < min {
                return Err(ConstraintViolation::HeightTooSmall);
            }
        }
        if let Some(max) = bound(self.max_height) {
            if dimensions.height > max {
                return Err(ConstraintViolation::HeightTooLarge);
            }
        }
        if exceeds_kb(file_size_bytes, self.max_file_size_kb) {
            return Err(ConstraintViolation::FileSizeTooLarge);
        }
        Ok(())
    }

    pub fn is_unconstrained(&self) -> bool {
        bound(self.min_width).is_none()
            && bound(self.max_width).is_none()
            && bound(self.min_height).is_none()
            && bound(self.max_height).is_none()
            && bound(self.max_file_size_kb).is_none()
    }
}

/// Pixel dimensions of a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Free function form of [`ImageConstraints::validate`].
pub fn validate(
    dimensions: Dimensions,
    file_size_bytes: u64,
    constraints: &ImageConstraints,
) -> Result<(), ConstraintViolation> {
    constraints.validate(dimensions, file_size_bytes)
}

/// Size check for non-image uploads.
pub fn check_file_size(
    file_size_bytes: u64,
    max_file_size_kb: Option<u64>,
) -> Result<(), ConstraintViolation> {
    if exceeds_kb(file_size_bytes, max_file_size_kb) {
        return Err(ConstraintViolation::FileSizeTooBig);
    }
    Ok(())
}

fn bound<T: Copy + Default + PartialEq>(value: Option<T>) -> Option<T> {
    value.filter(|v| *v != T::default())
}

// Fractional kilobytes, no rounding
fn exceeds_kb(file_size_bytes: u64, max_kb: Option<u64>) -> bool {
    match bound(max_kb) {
        Some(max) => (file_size_bytes as f64 / 1024.0) > max as f64,
        None => false,
    }
}
