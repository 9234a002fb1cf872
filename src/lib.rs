pub mod cliq;
pub mod report;
pub mod utils;

// Re-export common items
pub use cliq::{CliqReporter, DeliveryExecutor, ScreenshotUploader};
pub use report::{aggregate, load_results};
