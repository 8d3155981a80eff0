#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod board;
mod config;
mod game;
mod point;
pub mod protocol;
mod ship;
mod strategy;

#[cfg(feature = "std")]
pub mod link;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod relay;

pub use board::*;
pub use config::*;
pub use game::*;
pub use point::*;
pub use protocol::*;
pub use ship::*;
pub use strategy::*;

#[cfg(feature = "std")]
pub use link::{LinkEvent, PeerLink};
#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use relay::{GameState, Registry, RelayServer};
