mod core;

pub use core::Table;
