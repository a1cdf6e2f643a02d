mod common;

use common::synthetic_image::{checkerboard, flat, noise, pad_rows};
use pixel_engine::filters::convolution::apply_kernel;
use pixel_engine::filters::grayscale::grayscale;
use pixel_engine::filters::histogram::{equalize, generate};
use pixel_engine::filters::kernel::low_pass;
use pixel_engine::filters::median::median;
use pixel_engine::{
    combine, BitwiseOp, Kernel, MedianWindow, Pixel, PixelBuffer, PixelFormat,
    DEFAULT_EQUALIZATION_LEVELS,
};

const FORMATS: [PixelFormat; 4] = [
    PixelFormat::Rgb8,
    PixelFormat::Rgba8,
    PixelFormat::Bgr8,
    PixelFormat::Bgra8,
];

#[test]
fn raw_decoded_roundtrip_strips_padding() {
    for format in FORMATS {
        let img = noise(7, 5, format, 3);
        let row_len = 7 * format.bytes_per_pixel();
        for extra in [0, 1, 3, 8] {
            let padded = pad_rows(img.bytes(), row_len, row_len + extra, 0xAB);
            let decoded =
                PixelBuffer::from_raw_decoded(&padded, 7, 5, row_len + extra, format).unwrap();
            assert_eq!(decoded.to_raw_bytes(), img.to_raw_bytes(), "{format:?} +{extra}");
        }
    }
}

#[test]
fn grayscale_is_idempotent() {
    for format in FORMATS {
        let once = grayscale(&noise(9, 4, format, 11)).unwrap();
        assert_eq!(grayscale(&once).unwrap(), once);
    }
}

#[test]
fn box_blur_keeps_flat_interior() {
    for format in FORMATS {
        for v in [0u8, 9, 128, 200, 255] {
            let img = flat(6, 6, format, v);
            let out = apply_kernel(&img, &low_pass()).unwrap();
            for y in 1..5 {
                for x in 1..5 {
                    let px = out.get_pixel(x, y).unwrap();
                    assert_eq!((px.r, px.g, px.b), (v as f64, v as f64, v as f64));
                }
            }
        }
    }
}

#[test]
fn histogram_counts_every_pixel() {
    for (w, h) in [(1, 1), (13, 7), (64, 3)] {
        let hist = generate(&noise(w, h, PixelFormat::Bgra8, 5));
        assert_eq!(hist.counts().iter().sum::<u64>(), (w * h) as u64);
    }
    assert_eq!(generate(&PixelBuffer::new(0, 0, PixelFormat::Rgb8).unwrap()).total(), 0);
}

#[test]
fn equalization_stays_within_levels() {
    let img = checkerboard(24, 24, 4, PixelFormat::Rgb8);
    let hist = generate(&img);
    for levels in [2, 3, DEFAULT_EQUALIZATION_LEVELS, 100, 256] {
        let map = equalize(&hist, hist.total(), levels).unwrap();
        assert!(map.mapping().iter().all(|&v| (v as usize) <= levels - 1));
    }
}

#[test]
fn bitwise_self_identities() {
    for format in FORMATS {
        let img = noise(5, 6, format, 23);
        assert_eq!(combine(&img, &img, BitwiseOp::And).unwrap(), img);
        assert!(combine(&img, &img, BitwiseOp::Xor)
            .unwrap()
            .bytes()
            .iter()
            .all(|&b| b == 0));
    }
}

#[test]
fn scenario_three_by_three() {
    let bytes = [1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6, 7, 7, 7, 8, 8, 8, 9, 9, 9];
    let img = PixelBuffer::from_raw_decoded(&bytes, 3, 3, 9, PixelFormat::Rgb8).unwrap();

    assert_eq!(img.get_pixel(1, 1).unwrap(), Pixel::rgb(5.0, 5.0, 5.0));
    assert_eq!(img.to_raw_bytes(), bytes.to_vec());

    let ones = Kernel::uniform(3, 1.0).unwrap();
    let out = apply_kernel(&img, &ones).unwrap();
    assert_eq!(out.get_pixel(1, 1).unwrap(), Pixel::rgb(45.0, 45.0, 45.0));

    let blurred = apply_kernel(&img, &low_pass()).unwrap();
    assert_eq!(blurred.get_pixel(1, 1).unwrap(), Pixel::rgb(5.0, 5.0, 5.0));
}

#[test]
fn median_of_flat_image() {
    for window in MedianWindow::ALL {
        let img = flat(9, 9, PixelFormat::Rgba8, 61);
        assert_eq!(median(&img, window).unwrap(), img, "{window}");
    }
    let img = flat(5, 5, PixelFormat::Rgb8, 200);
    let out = median(&img, MedianWindow::Three).unwrap();
    for y in 1..4 {
        for x in 1..4 {
            assert_eq!(out.get_pixel(x, y).unwrap(), Pixel::rgb(200.0, 200.0, 200.0));
        }
    }
}
