pub mod async_writer;
pub mod clean_reporter;
pub mod results_manager;
pub mod writer_csv;
pub mod writer_jsonl;

pub use async_writer::spawn_jsonl_writer;
pub use clean_reporter::{render_result, ScanReport};
pub use results_manager::cleanup_results;
pub use writer_csv::write_csv;
pub use writer_jsonl::write_top_txt;
pub use writer_jsonl::ScanRecord;
