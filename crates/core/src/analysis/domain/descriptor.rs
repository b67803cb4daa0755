//! Hand-engineered image descriptors.
//!
//! A descriptor is the ordered concatenation of three normalized
//! histograms computed on the luma plane: the intensity distribution,
//! circular-neighbor texture codes, and magnitude-weighted gradient
//! orientations. Extraction is a pure function of the raster.

use thiserror::Error;

use crate::shared::face_image::FaceImage;

/// One bin per possible luma sample value.
pub const INTENSITY_BINS: usize = 256;

pub const DEFAULT_TEXTURE_RADIUS: u32 = 1;
pub const DEFAULT_TEXTURE_POINTS: u32 = 8;
pub const DEFAULT_GRADIENT_BINS: usize = 9;

/// Unsigned orientation span in degrees for the gradient histogram.
const ORIENTATION_SPAN_DEG: f64 = 180.0;

#[derive(Error, Debug)]
#[error("invalid image: zero-sized raster ({width}x{height})")]
pub struct InvalidImageError {
    pub width: u32,
    pub height: u32,
}

/// Descriptor extraction parameters, with the defaults made explicit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DescriptorConfig {
    /// Radius of the texture sampling circle, in pixels.
    pub texture_radius: u32,
    /// Number of evenly spaced sampling points on the circle.
    pub texture_points: u32,
    /// Number of equal-width orientation bins over [0°, 180°).
    pub gradient_bins: usize,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            texture_radius: DEFAULT_TEXTURE_RADIUS,
            texture_points: DEFAULT_TEXTURE_POINTS,
            gradient_bins: DEFAULT_GRADIENT_BINS,
        }
    }
}

impl DescriptorConfig {
    /// Number of texture histogram bins: one per possible neighbor code.
    pub fn texture_bins(&self) -> usize {
        1usize << self.texture_points
    }

    /// Total descriptor length (521 for the defaults).
    pub fn descriptor_len(&self) -> usize {
        INTENSITY_BINS + self.texture_bins() + self.gradient_bins
    }
}

/// Fixed-length feature vector: `[intensity, texture, gradient]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Descriptor(Vec<f64>);

impl Descriptor {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Extracts the full descriptor for a face.
///
/// Sub-vector order is fixed: intensity, texture, gradient. The length
/// depends only on `config`, never on raster content.
pub fn extract(face: &FaceImage, config: &DescriptorConfig) -> Result<Descriptor, InvalidImageError> {
    let luma = LumaPlane::from_face(face)?;
    let mut values = Vec::with_capacity(config.descriptor_len());
    values.extend_from_slice(&intensity_from_luma(&luma));
    values.extend_from_slice(&texture_from_luma(
        &luma,
        config.texture_radius,
        config.texture_points,
    ));
    values.extend_from_slice(&gradient_from_luma(&luma, config.gradient_bins));
    Ok(Descriptor(values))
}

/// 256-bin luma histogram, normalized by pixel count.
pub fn intensity_histogram(face: &FaceImage) -> Result<Vec<f64>, InvalidImageError> {
    let luma = LumaPlane::from_face(face)?;
    Ok(intensity_from_luma(&luma))
}

/// Histogram of circular-neighbor binary codes, normalized by pixel count.
///
/// Each interior pixel gets an n-bit code: one bit per sampling point,
/// set when the sampled luma is greater than or equal to the center's.
/// The first sampling point supplies the most significant bit. Pixels
/// within `radius` of any border are assigned code 0.
pub fn texture_histogram(
    face: &FaceImage,
    radius: u32,
    points: u32,
) -> Result<Vec<f64>, InvalidImageError> {
    let luma = LumaPlane::from_face(face)?;
    Ok(texture_from_luma(&luma, radius, points))
}

/// Magnitude-weighted histogram of unsigned gradient orientations.
///
/// Orientations are folded to [0°, 180°) and split into `bins`
/// equal-width bins. All-zero when the image has no gradient energy.
pub fn gradient_histogram(face: &FaceImage, bins: usize) -> Result<Vec<f64>, InvalidImageError> {
    let luma = LumaPlane::from_face(face)?;
    Ok(gradient_from_luma(&luma, bins))
}

/// Single-channel luma plane of a face, in row-major order.
struct LumaPlane {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl LumaPlane {
    fn from_face(face: &FaceImage) -> Result<Self, InvalidImageError> {
        if face.width() == 0 || face.height() == 0 {
            return Err(InvalidImageError {
                width: face.width(),
                height: face.height(),
            });
        }
        // ITU-R BT.601 weights, rounded to the nearest integer sample.
        let data = face
            .data()
            .chunks_exact(3)
            .map(|px| {
                let y = 0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64;
                y.round().clamp(0.0, 255.0) as u8
            })
            .collect();
        Ok(Self {
            data,
            width: face.width() as usize,
            height: face.height() as usize,
        })
    }

    fn at(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.width + col]
    }

    /// Sample with replicated borders.
    fn at_clamped(&self, row: i64, col: i64) -> f64 {
        let row = row.clamp(0, self.height as i64 - 1) as usize;
        let col = col.clamp(0, self.width as i64 - 1) as usize;
        self.at(row, col) as f64
    }

    fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

fn intensity_from_luma(luma: &LumaPlane) -> Vec<f64> {
    let mut counts = vec![0u64; INTENSITY_BINS];
    for &sample in &luma.data {
        counts[sample as usize] += 1;
    }
    normalize_counts(&counts, luma.pixel_count() as f64)
}

fn texture_from_luma(luma: &LumaPlane, radius: u32, points: u32) -> Vec<f64> {
    let bins = 1usize << points;
    let mut counts = vec![0u64; bins];
    let border = radius as usize;

    for row in 0..luma.height {
        for col in 0..luma.width {
            let interior = row >= border
                && row + border < luma.height
                && col >= border
                && col + border < luma.width;
            let code = if interior {
                neighbor_code(luma, row, col, radius, points)
            } else {
                0
            };
            counts[code] += 1;
        }
    }
    normalize_counts(&counts, luma.pixel_count() as f64)
}

/// Binary code for one interior pixel.
///
/// Sampling points sit on a circle of the given radius, evenly spaced
/// starting from angle 0, at nearest-integer offsets from the center.
fn neighbor_code(luma: &LumaPlane, row: usize, col: usize, radius: u32, points: u32) -> usize {
    let center = luma.at(row, col);
    let r = radius as f64;
    let mut code = 0usize;
    for k in 0..points {
        let angle = std::f64::consts::TAU * k as f64 / points as f64;
        let sample_row = (row as f64 + r * angle.cos()).round() as usize;
        let sample_col = (col as f64 + r * angle.sin()).round() as usize;
        let bit = usize::from(luma.at(sample_row, sample_col) >= center);
        code = (code << 1) | bit;
    }
    code
}

fn gradient_from_luma(luma: &LumaPlane, bins: usize) -> Vec<f64> {
    let mut hist = vec![0.0f64; bins];
    let mut total = 0.0f64;

    for row in 0..luma.height as i64 {
        for col in 0..luma.width as i64 {
            let (gx, gy) = sobel_at(luma, row, col);
            let magnitude = (gx * gx + gy * gy).sqrt();
            if magnitude == 0.0 {
                continue;
            }
            let orientation = gy.atan2(gx).to_degrees().rem_euclid(ORIENTATION_SPAN_DEG);
            let bin = ((orientation / ORIENTATION_SPAN_DEG) * bins as f64) as usize;
            hist[bin.min(bins - 1)] += magnitude;
            total += magnitude;
        }
    }

    if total > 0.0 {
        for v in &mut hist {
            *v /= total;
        }
    }
    hist
}

/// 3x3 Sobel derivatives at one pixel, with replicated borders.
fn sobel_at(luma: &LumaPlane, row: i64, col: i64) -> (f64, f64) {
    let p = |dr: i64, dc: i64| luma.at_clamped(row + dr, col + dc);

    let gx = (p(-1, 1) + 2.0 * p(0, 1) + p(1, 1)) - (p(-1, -1) + 2.0 * p(0, -1) + p(1, -1));
    let gy = (p(1, -1) + 2.0 * p(1, 0) + p(1, 1)) - (p(-1, -1) + 2.0 * p(-1, 0) + p(-1, 1));
    (gx, gy)
}

fn normalize_counts(counts: &[u64], total: f64) -> Vec<f64> {
    if total <= 0.0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&c| c as f64 / total).collect()
}
