use image::{DynamicImage, GenericImageView, RgbImage, imageops::FilterType};
use palette::{FromColor, Lab, Srgb, white_point::D65};

use crate::Tunables;

/// Colour fingerprint of a single image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorFeatures {
    /// Mean RGB over every analysed pixel, each channel in `0.0..=255.0`.
    pub average: [f64; 3],
    pub lab: Lab<D65, f64>,
    /// Hue angle in `[0, 360)`; exactly 0 for grays.
    pub hue: f64,
    /// `max(width, height)` of the analysed (possibly downscaled) image.
    pub long_side: u32,
}

impl ColorFeatures {
    /// Derive the perceptual features from an average colour.
    pub fn from_average(average: [f64; 3], long_side: u32) -> Self {
        let srgb = Srgb::new(average[0] / 255.0, average[1] / 255.0, average[2] / 255.0);
        Self {
            average,
            lab: Lab::from_color(srgb),
            hue: hue_degrees(srgb),
            long_side,
        }
    }

    /// `#rrggbb`, each channel rounded and clamped to `0..=255`.
    pub fn display_color(&self) -> String {
        let [r, g, b] = self.average.map(|c| c.round().clamp(0.0, 255.0) as u8);
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// HSV hue of a normalized colour, using the hexagonal definition.
pub fn hue_degrees(rgb: Srgb<f64>) -> f64 {
    let (r, g, b) = (rgb.red, rgb.green, rgb.blue);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    if d == 0.0 {
        return 0.0;
    }
    let hue = if max == r {
        60.0 * ((g - b) / d) + 360.0
    } else if max == g {
        60.0 * ((b - r) / d) + 120.0
    } else {
        60.0 * ((r - g) / d) + 240.0
    };
    hue.rem_euclid(360.0)
}

/// Analysis dimensions for an image, or `None` when it is already small enough.
///
/// The long side is brought down to `ceiling` and the short side follows
/// proportionally (truncated, never below one pixel).
pub fn analysis_size(width: u32, height: u32, ceiling: u32) -> Option<(u32, u32)> {
    let long_side = width.max(height);
    if long_side <= ceiling {
        return None;
    }
    let ratio = f64::from(ceiling) / f64::from(long_side);
    let w = ((f64::from(width) * ratio) as u32).max(1);
    let h = ((f64::from(height) * ratio) as u32).max(1);
    Some((w, h))
}

// ------------------------------------------------------------
// Averaging
// ------------------------------------------------------------

/// Compute the colour fingerprint of a decoded image.
///
/// Steps performed:
/// 1. Drop alpha / palette information by converting to 8-bit RGB.
/// 2. If the long side exceeds `tunables.max_analysis_side`, resize with a
///    bilinear (triangle) filter.
/// 3. Average every channel over all remaining pixels.
pub fn analyze(img: &DynamicImage, tunables: &Tunables) -> ColorFeatures {
    let (orig_w, orig_h) = img.dimensions();
    let rgb = img.to_rgb8();

    let rgb: RgbImage = match analysis_size(orig_w, orig_h, tunables.max_analysis_side) {
        Some((w, h)) => image::imageops::resize(&rgb, w, h, FilterType::Triangle),
        None => rgb,
    };
    let (w, h) = rgb.dimensions();

    let mut sums = [0.0_f64; 3];
    for px in rgb.pixels() {
        for (sum, &channel) in sums.iter_mut().zip(px.0.iter()) {
            *sum += f64::from(channel);
        }
    }
    let count = f64::from(w) * f64::from(h);
    let average = if count > 0.0 { sums.map(|s| s / count) } else { [0.0; 3] };

    ColorFeatures::from_average(average, w.max(h))
}

/// Decode an in-memory image and compute its fingerprint.
pub fn extract_bytes(input: &[u8], tunables: &Tunables) -> image::ImageResult<ColorFeatures> {
    let img = image::load_from_memory(input)?;
    Ok(analyze(&img, tunables))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn extract_file(
    path: &std::path::Path,
    tunables: &Tunables,
) -> image::ImageResult<ColorFeatures> {
    let img = image::open(path)?;
    Ok(analyze(&img, tunables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbaImage};

    fn srgb(r: f64, g: f64, b: f64) -> Srgb<f64> {
        Srgb::new(r / 255.0, g / 255.0, b / 255.0)
    }

    #[test]
    fn hue_of_primaries() {
        assert!((hue_degrees(srgb(255.0, 0.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((hue_degrees(srgb(0.0, 255.0, 0.0)) - 120.0).abs() < 1e-9);
        assert!((hue_degrees(srgb(0.0, 0.0, 255.0)) - 240.0).abs() < 1e-9);
        assert!((hue_degrees(srgb(255.0, 255.0, 0.0)) - 60.0).abs() < 1e-9);
        assert!((hue_degrees(srgb(255.0, 0.0, 255.0)) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn gray_hue_is_zero() {
        assert_eq!(hue_degrees(srgb(128.0, 128.0, 128.0)), 0.0);
        assert_eq!(hue_degrees(srgb(0.0, 0.0, 0.0)), 0.0);
        assert_eq!(hue_degrees(srgb(255.0, 255.0, 255.0)), 0.0);
    }

    #[test]
    fn lab_of_white_and_black() {
        let white = ColorFeatures::from_average([255.0; 3], 1);
        assert!((white.lab.l - 100.0).abs() < 0.01);
        assert!(white.lab.a.abs() < 0.01);
        assert!(white.lab.b.abs() < 0.01);

        let black = ColorFeatures::from_average([0.0; 3], 1);
        assert!(black.lab.l.abs() < 1e-6);
    }

    #[test]
    fn lab_of_red_matches_reference() {
        let red = ColorFeatures::from_average([255.0, 0.0, 0.0], 1);
        assert!((red.lab.l - 53.24).abs() < 0.05);
        assert!((red.lab.a - 80.09).abs() < 0.1);
        assert!((red.lab.b - 67.20).abs() < 0.1);
    }

    #[test]
    fn display_color_of_pure_red() {
        let red = ColorFeatures::from_average([255.0, 0.0, 0.0], 1);
        assert_eq!(red.display_color(), "#ff0000");
    }

    #[test]
    fn display_color_clamps_overflowing_channels() {
        let c = ColorFeatures::from_average([255.6, -0.4, 127.5], 1);
        assert_eq!(c.display_color(), "#ff0080");
    }

    #[test]
    fn analysis_size_keeps_small_images() {
        assert_eq!(analysis_size(1024, 300, 1024), None);
        assert_eq!(analysis_size(10, 10, 1024), None);
    }

    #[test]
    fn analysis_size_scales_long_side_to_ceiling() {
        assert_eq!(analysis_size(2048, 1000, 1024), Some((1024, 500)));
        assert_eq!(analysis_size(300, 3000, 1024), Some((102, 1024)));
        assert_eq!(analysis_size(5000, 1, 1024), Some((1024, 1)));
    }

    #[test]
    fn averages_solid_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(7, 3, Rgb([10, 200, 30])));
        let f = analyze(&img, &Tunables::default());
        assert_eq!(f.average, [10.0, 200.0, 30.0]);
        assert_eq!(f.long_side, 7);
    }

    #[test]
    fn averages_two_halves() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 100, 51]));
        let f = analyze(&DynamicImage::ImageRgb8(img), &Tunables::default());
        assert_eq!(f.average, [127.5, 50.0, 25.5]);
    }

    #[test]
    fn alpha_is_ignored() {
        let img = RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 255, 0]));
        let f = analyze(&DynamicImage::ImageRgba8(img), &Tunables::default());
        assert_eq!(f.average, [0.0, 0.0, 255.0]);
    }

    #[test]
    fn large_images_are_downscaled() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 20, Rgb([50, 60, 70])));
        let tunables = Tunables { max_analysis_side: 16, ..Tunables::default() };
        let f = analyze(&img, &tunables);
        assert_eq!(f.long_side, 16);
        for (got, want) in f.average.iter().zip([50.0, 60.0, 70.0]) {
            assert!((got - want).abs() < 1.0);
        }
    }

    #[test]
    fn undecodable_bytes_fail() {
        assert!(extract_bytes(b"definitely not a png", &Tunables::default()).is_err());
    }
}
