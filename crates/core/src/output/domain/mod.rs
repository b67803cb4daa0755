pub mod image_writer;
pub mod result_writer;
