pub mod error;
pub mod format;
pub mod interactive;
pub mod output;
pub mod pagination;

pub use error::{AppError, AppResult, FlowResult, handle_flow, report_error};
pub use output::{OutputStyle, print_success, print_warning};
