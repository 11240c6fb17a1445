pub mod refresher;

pub use refresher::{RefreshState, Refresher, TickReport};
