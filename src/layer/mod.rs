//! Layer records: the wire contract between capture and import
//!
//! A capture produces a flat `Vec<LayerRecord>`:
//! - element 0 is always the root FRAME
//! - the rest follow document pre-order, which is also paint order
//! - there is no nesting; later records paint over earlier ones

pub mod bundle;
pub mod record;

pub use bundle::{LayerBundle, TRANSFER_ID_LEN};
pub use record::{LayerKind, LayerRecord, validate_sequence};
