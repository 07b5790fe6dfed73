pub mod threaded_preview_executor;
