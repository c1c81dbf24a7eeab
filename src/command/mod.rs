// Container CLI command construction: typed operations and the fluent builder.

pub mod builder;
pub mod operation;

pub use builder::{BuildError, ContainerCli};
pub use operation::{Operation, join_ids};
