//! Common definitions shared by the pipeline and the renderers
//!
//! - `namespaces`: standard namespace URI constants

pub mod namespaces;

pub use namespaces::ns;
