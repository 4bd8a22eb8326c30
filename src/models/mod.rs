pub mod error;
pub mod filter;
pub mod registry;
pub mod room;

pub use error::{RegistryError, RegistryResult};
pub use filter::{CapacityFilter, RoomFilter, TriState};
pub use registry::{RoomRegistry, RoomStats};
pub use room::{Room, RoomRequest};
