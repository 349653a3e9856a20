pub mod app;
pub mod card;
pub mod map;
pub mod state;
pub mod terminal;
pub mod ui;

pub use app::{Action, App, InputMode};
pub use card::DeviceCard;
pub use state::{DashboardState, Stats};
