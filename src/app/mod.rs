pub mod state;
pub mod ui;

pub use state::{App, AppWrapper, CacheKey, Report, DEFAULT_BASE_URL};
