pub mod analyze_batch_use_case;
pub mod batch_result;
pub mod infrastructure;
pub mod source_executor;
