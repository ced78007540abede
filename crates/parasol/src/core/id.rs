use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for an overlay mounted on a stage.
    pub struct OverlayId;

    /// Identifier for a listener registered in a listener table.
    pub struct ListenerId;

    /// Identifier for a scheduled timer.
    pub struct TimerId;

    /// Identifier for a statically opened instance.
    pub struct InstanceId;
}
