pub mod threaded_source_executor;
