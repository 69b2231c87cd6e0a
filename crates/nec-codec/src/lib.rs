#![cfg_attr(not(any(test, feature = "std")), no_std)]
//! Encoder and decoder for the NEC infrared remote protocol.
//!
//! This crate knows nothing about the hardware that produces or consumes the pulses. A
//! remote-control transmission is modelled as a sequence of [`Symbol`]s, each a mark
//! (carrier on) duration followed by a space (carrier off) duration, in microseconds.
//!
//! ## Frame layout
//!
//! ```text
//! | leading code | address bit 0 .. 15 | command bit 0 .. 15 | ending burst |
//! |  9000/4500   |  560/560 or 560/1690 (logic 0 / logic 1)   |   560/idle   |
//! ```
//!
//! Bits are sent least-significant first. While a key is held down the remote sends a
//! repeat frame (9000/2250 followed by the ending burst) instead of the full frame.
//!
//! [`Decoder`] owns the receive-side state: it classifies a captured frame by length,
//! parses it, looks the key up in a [`KeyMap`] and remembers the last scan code so that
//! repeat frames can be attributed.

mod decode;
mod dispatch;
mod encode;
mod keymap;
mod rearm;
mod symbol;
pub mod timing;

pub use self::{decode::*, dispatch::*, encode::*, keymap::*, rearm::*, symbol::*};
