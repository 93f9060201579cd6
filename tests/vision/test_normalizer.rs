// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Normalizer tests: every decodable upload becomes a three-channel JPEG

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{
    ColorType, DynamicImage, GrayAlphaImage, GrayImage, ImageBuffer, ImageFormat, LumaA, Rgba,
    RgbaImage,
};
use image_analyzer::vision::{normalize, ImageError};
use std::io::Cursor;

// 3x2 indexed PNG, palette red/green/blue with alpha 0/128/255 in tRNS
const PALETTE_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAMAAAACCAMAAACqqpYoAAAACVBMVEX/AAAA/wAAAP8tSs2KAAAAA3RSTlMAgP/s97MYAAAAEElEQVR4nGNgYGRiYGJkAAAAIAAHHStwoAAAAABJRU5ErkJggg==";

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

fn decode_jpeg(bytes: &[u8]) -> DynamicImage {
    image::load_from_memory_with_format(bytes, ImageFormat::Jpeg).unwrap()
}

#[test]
fn test_transparent_png_becomes_rgb_jpeg() {
    let mut rgba = RgbaImage::new(10, 20);
    rgba.put_pixel(0, 0, Rgba([255, 0, 0, 0]));
    let bytes = encode(DynamicImage::ImageRgba8(rgba), ImageFormat::Png);

    let normalized = normalize(&bytes).unwrap();
    assert_eq!(normalized.info().format, ImageFormat::Png);
    assert_eq!(normalized.info().size_bytes, bytes.len());

    let decoded = decode_jpeg(normalized.as_bytes());
    assert_eq!(decoded.color(), ColorType::Rgb8);
    assert_eq!((decoded.width(), decoded.height()), (10, 20));
}

#[test]
fn test_indexed_png_with_transparency_becomes_rgb_jpeg() {
    let bytes = STANDARD.decode(PALETTE_PNG_BASE64).unwrap();

    let normalized = normalize(&bytes).unwrap();
    assert_eq!(normalized.info().format, ImageFormat::Png);
    assert_eq!((normalized.info().width, normalized.info().height), (3, 2));

    let decoded = decode_jpeg(normalized.as_bytes());
    assert_eq!(decoded.color(), ColorType::Rgb8);
    assert_eq!((decoded.width(), decoded.height()), (3, 2));
}

#[test]
fn test_sixteen_bit_png_becomes_eight_bit_rgb() {
    let rgba16: ImageBuffer<Rgba<u16>, Vec<u16>> =
        ImageBuffer::from_pixel(5, 4, Rgba([65535, 1024, 0, 30000]));
    let bytes = encode(DynamicImage::ImageRgba16(rgba16), ImageFormat::Png);

    let normalized = normalize(&bytes).unwrap();
    let decoded = decode_jpeg(normalized.as_bytes());
    assert_eq!(decoded.color(), ColorType::Rgb8);
    assert_eq!((decoded.width(), decoded.height()), (5, 4));
}

#[test]
fn test_grayscale_inputs_become_rgb() {
    let gray = encode(DynamicImage::ImageLuma8(GrayImage::new(7, 3)), ImageFormat::Png);
    let gray_alpha = encode(
        DynamicImage::ImageLumaA8(GrayAlphaImage::from_pixel(7, 3, LumaA([128, 64]))),
        ImageFormat::Png,
    );

    for bytes in [gray, gray_alpha] {
        let normalized = normalize(&bytes).unwrap();
        let decoded = decode_jpeg(normalized.as_bytes());
        assert_eq!(decoded.color(), ColorType::Rgb8);
        assert_eq!((decoded.width(), decoded.height()), (7, 3));
    }
}

#[test]
fn test_jpeg_input_is_reencoded() {
    let bytes = encode(
        DynamicImage::ImageRgb8(image::RgbImage::new(16, 16)),
        ImageFormat::Jpeg,
    );
    let normalized = normalize(&bytes).unwrap();
    assert_eq!(normalized.info().format, ImageFormat::Jpeg);
    assert!(normalized.as_bytes().starts_with(&[0xFF, 0xD8, 0xFF]));
}

#[test]
fn test_rejects_non_images() {
    assert!(matches!(normalize(&[]), Err(ImageError::EmptyData)));
    assert!(normalize(b"GIF? no, just text").is_err());

    let mut truncated = encode(DynamicImage::ImageRgb8(image::RgbImage::new(8, 8)), ImageFormat::Png);
    truncated.truncate(30);
    assert!(normalize(&truncated).is_err());
}
