pub mod fetch_service;
pub mod poll_service;

pub use fetch_service::{DeviceSource, TrackingClient};
pub use poll_service::{PollEvent, Poller};
