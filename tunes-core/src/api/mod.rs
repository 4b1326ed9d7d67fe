//! Typed request pipeline: endpoint descriptors, decoders, transports.

pub mod decode;
pub mod endpoint;
pub mod pipeline;
pub mod transport;

pub use decode::{Decoder, JsonDecoder};
