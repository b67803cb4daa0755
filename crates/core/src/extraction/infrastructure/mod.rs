pub mod center_crop_extractor;
pub mod image_file_reader;
