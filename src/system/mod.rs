pub mod memory;
pub mod ping;
pub mod platform;
pub mod sampler;
pub mod snapshot;

pub use memory::{ProcessMemory, ProcessStatsError};
pub use ping::{PingResult, Pinger};
pub use sampler::Sampler;
pub use snapshot::SystemSnapshot;
