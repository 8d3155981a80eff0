//! The relay: a single UDP process that registers players, rendezvouses
//! pairs of them into games, and forwards in-game traffic between them.

mod registry;
mod server;

pub use registry::{GameState, Registry};
pub use server::RelayServer;
