//! Columnar in-memory storage for the Strata sampling engine.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

mod bitmap;
mod column;
mod record;
mod schema;
mod table;

pub use bitmap::NullBitmap;
pub use column::Column;
pub use record::Record;
pub use schema::{Field, FieldMode, Schema};
pub use table::Table;
