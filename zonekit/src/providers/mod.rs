//! DNS provider implementations

#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "memory")]
pub use memory::{MemoryProvider, MemoryProviderBuilder};
