mod arguments;
mod constructible;
mod ids;
mod modifier;
mod subject;
mod types;
mod warehouse;

pub use crate::arguments::*;
pub use crate::constructible::*;
pub use crate::ids::*;
pub use crate::modifier::*;
pub use crate::subject::*;
pub use crate::types::*;
pub use crate::warehouse::*;
