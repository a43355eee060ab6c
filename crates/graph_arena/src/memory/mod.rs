//! # Memory Management
//!
//! The byte arena, typed handles and the slot pools built on top of them.
//!
//! ## Design Philosophy
//!
//! Fresh storage is bump-allocated from the arena. After that:
//! - Released objects go to their pool's free list
//! - Reissuing from the free list costs no arena allocation
//! - Only an arena reset gives memory back

mod arena;
mod handle;
mod pool;

pub use arena::ByteArena;
pub use handle::{
    AdjacencyId, ConnectionId, DoubleLinkId, EdgeId, Handle, NodeId, NodeRefId, RegistryCellId,
};
pub use pool::{GenerationChain, Pool};
