//! Arena types for the scene graph

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a node stored in a [`NodeArena`]
    ///
    /// Handles are plain copyable keys, so children lists and the name
    /// registry can share nodes without borrowing from the arena.
    pub struct NodeHandle;
}

/// Handle-based map owning every node of one scene
pub type NodeArena<T> = SlotMap<NodeHandle, T>;
