//! Small line-based widgets shared by the dashboard.

pub mod header;
pub mod prompt;
pub mod status;

pub use header::Header;
pub use prompt::PathPrompt;
pub use status::{KeyHints, StatusLine};
