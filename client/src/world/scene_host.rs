use crate::world::entity::Entity;

/// The scene graph the client's entities live in.
pub trait SceneHost {
    /// Entities pre-placed in the active scene, in root order. The order
    /// decides the provisional ids they are announced under.
    fn root_entities(&mut self) -> Vec<Entity>;

    /// Gives a freshly created entity its visual representation.
    fn instantiate(&mut self, entity: &Entity);
}
