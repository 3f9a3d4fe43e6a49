//! Upload bytes to model input tensor.

use image::imageops::{self, FilterType};
use tract_onnx::prelude::tract_ndarray::Array4;

use crate::VisionError;

pub const INPUT_WIDTH: u32 = 224;
pub const INPUT_HEIGHT: u32 = 224;
pub const INPUT_CHANNELS: usize = 3;

/// NHWC batch of one image, values in `[0, 1]`.
pub type ImageTensor = Array4<f32>;

/// Decodes `bytes` and converts them into the model input tensor.
///
/// The image is converted to RGB (grayscale expanded, alpha dropped), resized
/// to exactly 224x224 with bicubic resampling and scaled from `0..=255` to
/// `0.0..=1.0`. Output is deterministic for identical input.
pub fn preprocess(bytes: &[u8]) -> Result<ImageTensor, VisionError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| VisionError::Decode(e.to_string()))?;
    let rgb = decoded.to_rgb8();
    let resized = imageops::resize(&rgb, INPUT_WIDTH, INPUT_HEIGHT, FilterType::CatmullRom);

    let shape = (1, INPUT_HEIGHT as usize, INPUT_WIDTH as usize, INPUT_CHANNELS);
    Ok(Array4::from_shape_fn(shape, |(_, y, x, c)| {
        let pixel = resized.get_pixel(x as u32, y as u32);
        f32::from(pixel[c]) / 255.0
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        buf
    }

    fn gradient_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8])
        });
        encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
    }

    #[test]
    fn test_output_shape_and_range() {
        for (w, h) in [(224, 224), (640, 480), (17, 300), (1, 1)] {
            let tensor = preprocess(&gradient_png(w, h)).unwrap();
            assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
            assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn test_deterministic() {
        let bytes = gradient_png(500, 333);
        let a = preprocess(&bytes).unwrap();
        let b = preprocess(&bytes).unwrap();
        let a_bits: Vec<u32> = a.iter().map(|v| v.to_bits()).collect();
        let b_bits: Vec<u32> = b.iter().map(|v| v.to_bits()).collect();
        assert_eq!(a_bits, b_bits);
    }

    #[test]
    fn test_exact_size_keeps_pixel_values() {
        let img = RgbImage::from_pixel(224, 224, Rgb([255, 0, 51]));
        let tensor = preprocess(&encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)).unwrap();
        assert_eq!(tensor[[0, 10, 20, 0]], 1.0);
        assert_eq!(tensor[[0, 10, 20, 1]], 0.0);
        assert_eq!(tensor[[0, 10, 20, 2]], 51.0 / 255.0);
    }

    #[test]
    fn test_grayscale_expanded_to_rgb() {
        let img = GrayImage::from_pixel(50, 80, Luma([128]));
        let tensor = preprocess(&encode(DynamicImage::ImageLuma8(img), ImageFormat::Png)).unwrap();
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        let expected = 128.0 / 255.0;
        assert_eq!(tensor[[0, 100, 100, 0]], expected);
        assert_eq!(tensor[[0, 100, 100, 1]], expected);
        assert_eq!(tensor[[0, 100, 100, 2]], expected);
    }

    #[test]
    fn test_alpha_channel_dropped() {
        let img = RgbaImage::from_pixel(224, 224, Rgba([0, 255, 0, 10]));
        let tensor = preprocess(&encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)).unwrap();
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        assert_eq!(tensor[[0, 0, 0, 0]], 0.0);
        assert_eq!(tensor[[0, 0, 0, 1]], 1.0);
    }

    #[test]
    fn test_jpeg_decodes() {
        let img = RgbImage::from_pixel(300, 200, Rgb([30, 160, 40]));
        let tensor = preprocess(&encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)).unwrap();
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn test_non_image_bytes_rejected() {
        let err = preprocess(b"definitely not an image").unwrap_err();
        assert!(matches!(err, VisionError::Decode(ref msg) if !msg.is_empty()));
        assert!(matches!(preprocess(&[]), Err(VisionError::Decode(_))));
    }

    #[test]
    fn test_truncated_png_rejected() {
        let bytes = gradient_png(64, 64);
        assert!(matches!(preprocess(&bytes[..bytes.len() / 2]), Err(VisionError::Decode(_))));
    }
}
