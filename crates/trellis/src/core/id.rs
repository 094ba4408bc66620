use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a node stored in the tree arena.
    ///
    /// This is the client-side handle for a node. The wire identity of a node
    /// is its string id, which is only unique among siblings.
    pub struct NodeId;
}
