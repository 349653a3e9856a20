pub mod settings;

pub use settings::{Api, Display, Logger, Poll, Settings};
