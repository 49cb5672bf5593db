pub mod analytics;
pub mod enums;
pub mod models;

pub use analytics::*;
pub use enums::*;
pub use models::*;
