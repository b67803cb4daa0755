use ndarray::ArrayView3;

/// Number of channel samples per pixel. All rasters are RGB.
pub const CHANNELS: usize = 3;

/// An immutable RGB raster: contiguous bytes in row-major order.
///
/// Produced once at the decode or extraction boundary and consumed
/// read-only by the analysis layer; format conversion never happens
/// past those boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl FaceImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("FaceImage data length must match dimensions")
    }

    /// Resamples to the given dimensions with a Lanczos3 filter.
    ///
    /// Returns a clone when the dimensions already match.
    pub fn resample_to(&self, width: u32, height: u32) -> FaceImage {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let img = image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .expect("FaceImage data length must match dimensions");
        let resized =
            image::imageops::resize(&img, width, height, image::imageops::FilterType::Lanczos3);
        FaceImage::new(resized.into_raw(), width, height)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, CHANNELS)
    }
}
