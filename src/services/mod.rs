pub mod adapters;
pub mod discovery;
pub mod providers;
pub mod supersede;

pub use discovery::{DetailsKey, DiscoveryService, DiscoverySettings, Section};
pub use providers::{BackendClient, MovieApi};
pub use supersede::RequestTracker;
