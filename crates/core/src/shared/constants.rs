/// Side length, in pixels, that extracted faces are normalized to.
pub const DEFAULT_TARGET_SIZE: u32 = 128;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
