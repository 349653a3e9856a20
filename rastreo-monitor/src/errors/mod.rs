pub mod fetch;

pub use fetch::FetchError;
