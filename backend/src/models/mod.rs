//! Domain types shared by the repositories, the analysis core and the HTTP layer.

pub mod date_range;
pub mod macros;
pub mod song;

pub use date_range::*;
pub use song::*;
