//! Average-face computation and similarity scoring for batches of images.
//!
//! The pipeline collects face crops from a set of source images,
//! computes their pixelwise average, and ranks every face by how
//! similar its image descriptor is to the average's.

pub mod analysis;
pub mod extraction;
pub mod output;
pub mod pipeline;
pub mod shared;
