pub mod viewer;

pub use viewer::{ContainerSize, DragState, ViewerSession};
