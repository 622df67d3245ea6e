mod config;
mod constructibles;
mod context;
mod error;
mod magnitude;
mod pipeline;
mod requirements;
pub mod snapshot;
mod subjects;
mod tags;
#[cfg(test)]
mod testing;
mod warehouse;

pub use crate::config::*;
pub use crate::constructibles::*;
pub use crate::context::*;
pub use crate::error::*;
pub use crate::magnitude::*;
pub use crate::pipeline::*;
pub use crate::requirements::*;
pub use crate::snapshot::{SnapshotError, WorldSnapshot};
pub use crate::subjects::*;
pub use crate::tags::*;
pub use crate::warehouse::*;
