//! Page-image cleanup ahead of recognition.
//!
//! Scanned pages carry sensor noise, uneven lighting, and compression
//! speckle that measurably degrade OCR accuracy. The recipe here is fixed
//! and deliberately conservative: grayscale, a small median filter, a
//! global Otsu binarisation, and a near-identity morphological closing.
//! Every step is a pure transform — the same input raster always produces
//! byte-identical output.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::median_filter;
use imageproc::morphology::close;

/// Median-filter radius; 1 gives the 3×3 window.
const MEDIAN_RADIUS: u32 = 1;

/// Closing radius; 0 is the 1×1 structuring element — it keeps isolated
/// speckle in check after thresholding without eroding thin strokes.
const CLOSE_RADIUS: u8 = 0;

/// Clean one page image for recognition: grayscale → 3×3 median filter →
/// Otsu binarisation → minimal morphological closing.
///
/// Colour and single-channel inputs are both accepted; the first step
/// normalises everything to 8-bit grayscale. The result is strictly
/// two-level (0 or 255).
pub fn preprocess(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    let denoised = median_filter(&gray, MEDIAN_RADIUS, MEDIAN_RADIUS);
    let binary = binarize(&denoised, otsu_threshold(&denoised));
    close(&binary, Norm::LInf, CLOSE_RADIUS)
}

/// Threshold a grayscale image into a two-level image. The threshold is
/// inclusive on the ink side: pixels at or below it become black (ink),
/// the rest white (background), matching the convention of
/// [`otsu_threshold`], which returns the top intensity of the dark class.
fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let val = gray.get_pixel(x, y).0[0];
            let binary = if val <= threshold { 0u8 } else { 255u8 };
            output.put_pixel(x, y, Luma([binary]));
        }
    }
    output
}

/// Compute the Otsu threshold for a grayscale image.
///
/// Finds the threshold that maximises the between-class variance of the
/// dark and light pixel groups, from the image's own intensity histogram.
/// The returned value is the top intensity of the dark class, so callers
/// must treat it inclusively when classifying ink.
fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total_pixels = gray.width() as u64 * gray.height() as u64;
    if total_pixels == 0 {
        return 128;
    }

    let mut sum_total: f64 = 0.0;
    for (i, &count) in histogram.iter().enumerate() {
        sum_total += i as f64 * count as f64;
    }

    let mut sum_background: f64 = 0.0;
    let mut weight_background: u64 = 0;
    let mut max_variance: f64 = 0.0;
    let mut best_threshold: u8 = 0;

    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total_pixels - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if between_variance > max_variance {
            max_variance = between_variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}
