//! Record stream decoders
//!
//! Two independent implementations of the same conceptual contract with
//! different framing:
//! - [`TextDecoder`]: the line-oriented encoding production recordings use
//! - [`BinaryDecoder`]: the fixed-width binary framing, kept as the second
//!   half of the polymorphic pair
//!
//! Both consume an already-materialized byte buffer plus a shared
//! [`SchemaCatalog`](crate::SchemaCatalog), decode each field through the
//! common [`codec`], and recover from corruption locally instead of aborting
//! the stream.

mod binary;
pub mod codec;
mod text;

pub use binary::BinaryDecoder;
pub use text::TextDecoder;
