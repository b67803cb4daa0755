pub mod directory_result_writer;
pub mod image_file_writer;
