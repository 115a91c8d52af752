pub mod analysis;
pub mod library;
