/// Recording transport and renderer.
pub mod backend;
/// Harness for driving a tree with JSON literals.
pub mod harness;
