pub mod assign;
pub mod error;
pub mod filter;
pub mod profile;
pub mod query;
pub mod requirement;
pub mod score;
pub mod select;

pub use assign::{Assignment, AssignError, QueueBinding, QueueRequirement};
pub use error::{Result, SelectionError};
pub use profile::{CapabilityProfile, DeviceClass, MemoryHeap, QueueFamilyDescriptor, SurfaceCapabilityTable};
pub use query::AshDeviceQuery;
pub use requirement::Requirement;
pub use score::Score;
pub use select::{assign_queues, DeviceQuery, DeviceSelector, SelectedDevice};
