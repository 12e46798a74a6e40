use std::any::Any;

use tether_shared::{EntityId, EntityType, EventCode, PeerId, PropertyCell};

use crate::room::player::Player;

/// What a behaviour gets to see of its entity when a lifecycle hook runs.
#[derive(Clone, Copy, Debug)]
pub struct EntityContext<'a> {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub owner: &'a Player,
    pub is_mine: bool,
}

/// A replicable part of an entity.
///
/// The cells a behaviour exposes, and the order it exposes them in, make up
/// its part of the entity's wire layout. Implementations normally let
/// `replicated_properties!` write the visitors from an explicit field list.
pub trait Behaviour: Any {
    fn visit_properties(&self, visitor: &mut dyn FnMut(&dyn PropertyCell));

    fn visit_properties_mut(&mut self, visitor: &mut dyn FnMut(&mut dyn PropertyCell));

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn on_attached(&mut self, _context: &EntityContext, _spawn_payload: &[u8]) {}

    fn on_owner_changed(&mut self, _context: &EntityContext) {}

    fn on_detached(&mut self, _context: &EntityContext, _destroy_payload: &[u8]) {}

    fn on_event(&mut self, _sender: PeerId, _code: EventCode, _payload: &[u8]) {}

    /// Runs once per client update while the local player owns the entity
    fn on_entity_tick(&mut self, _context: &EntityContext) {}

    /// Runs once per client update while another player owns the entity
    fn on_proxy_tick(&mut self, _context: &EntityContext) {}
}

/// Implements the property visitors of `Behaviour` for the listed fields, in
/// the order given. Invoke it inside the `impl Behaviour` block:
///
/// ```ignore
/// impl Behaviour for Transform {
///     replicated_properties!(position, rotation);
/// }
/// ```
#[macro_export]
macro_rules! replicated_properties {
    ($($field:ident),* $(,)?) => {
        #[allow(unused_variables)]
        fn visit_properties(&self, visitor: &mut dyn FnMut(&dyn $crate::PropertyCell)) {
            $( visitor(&self.$field as &dyn $crate::PropertyCell); )*
        }

        #[allow(unused_variables)]
        fn visit_properties_mut(
            &mut self,
            visitor: &mut dyn FnMut(&mut dyn $crate::PropertyCell),
        ) {
            $( visitor(&mut self.$field as &mut dyn $crate::PropertyCell); )*
        }

        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };
}
