//! Frames for the Velux KLF-200 io-homecontrol gateway.
//!
//! # Crate Structure
//!
//! - [`frame`] — Wire codec, frame types, SLIP stream adapters
//!
//! The `klf200` binary (behind the `cli` feature) decodes and encodes
//! single frames from the command line.

/// Re-export frame types.
pub mod frame {
    pub use klf200_frame::*;
}

pub use klf200_frame::{decode_frame, Command, Frame, FrameError, Parameter};
