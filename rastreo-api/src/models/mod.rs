mod device;
mod location;

pub use device::*;
pub use location::*;
