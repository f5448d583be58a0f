//! Image decoding and resizing into the model's input layout.

use crate::error::VisionResult;
use image::imageops::{self, FilterType};
use ricewise_config::{ClassifierConfig, Resample};

/// How uploads are turned into model input.
#[derive(Debug, Clone, Copy)]
pub struct PreprocessConfig {
    /// Side length of the square input.
    pub size: u32,
    pub filter: FilterType,
    /// Scale pixel values from 0..255 to 0..1.
    pub normalize: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            size: 224,
            filter: FilterType::CatmullRom,
            normalize: false,
        }
    }
}

impl PreprocessConfig {
    pub fn from_classifier_config(config: &ClassifierConfig) -> Self {
        Self {
            size: config.input_size,
            filter: filter_for(config.resample),
            normalize: config.normalize,
        }
    }

    /// Number of values in one input tensor.
    pub fn tensor_len(&self) -> usize {
        let side = self.size as usize;
        side * side * 3
    }
}

fn filter_for(resample: Resample) -> FilterType {
    match resample {
        Resample::Nearest => FilterType::Nearest,
        Resample::Bilinear => FilterType::Triangle,
        Resample::Bicubic => FilterType::CatmullRom,
    }
}

/// Decode an encoded image into a `[size, size, 3]` row-major f32 buffer.
///
/// Any channel layout is converted to RGB first; aspect ratio is not kept.
pub fn preprocess(bytes: &[u8], config: &PreprocessConfig) -> VisionResult<Vec<f32>> {
    let rgb = image::load_from_memory(bytes)?.to_rgb8();
    let resized = imageops::resize(&rgb, config.size, config.size, config.filter);

    let scale = if config.normalize { 1.0 / 255.0 } else { 1.0 };
    Ok(resized
        .into_raw()
        .into_iter()
        .map(|v| v as f32 * scale)
        .collect())
}
