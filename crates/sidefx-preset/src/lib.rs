//! Preset library encoder for the SideFX Modulator JSFX.
//!
//! A [`ShapeDefinition`] is laid out into the plug-in's fixed slot array,
//! serialised as one space separated line, base64 encoded and wrapped into a
//! REAPER preset library record.

mod codec;
pub mod factory;
mod library;
mod shape;
mod slots;
mod store_json;

pub use codec::*;
pub use library::*;
pub use shape::*;
pub use slots::*;
pub use store_json::*;
