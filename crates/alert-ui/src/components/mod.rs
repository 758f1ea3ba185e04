pub mod header;
pub mod indicators;
pub mod progress_bar;

pub use header::Header;
pub use indicators::{StatusIndicator, TallyIndicator};
pub use progress_bar::{ProgressBarConfig, ShareBar};
