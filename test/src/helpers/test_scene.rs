use std::sync::{Arc, Mutex};

use tether_client::{Entity, EntityId, SceneHost};

/// Scene graph double: hands out a fixed set of root entities once and records
/// what gets instantiated
pub struct TestScene {
    roots: Vec<Entity>,
    instantiated: Arc<Mutex<Vec<EntityId>>>,
}

impl TestScene {
    pub fn new(roots: Vec<Entity>) -> Self {
        Self {
            roots,
            instantiated: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared view of instantiated entity ids, usable after the scene is
    /// handed to a client
    pub fn instantiated(&self) -> Arc<Mutex<Vec<EntityId>>> {
        self.instantiated.clone()
    }
}

impl SceneHost for TestScene {
    fn root_entities(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.roots)
    }

    fn instantiate(&mut self, entity: &Entity) {
        if let Some(id) = entity.id() {
            self.instantiated.lock().unwrap().push(id);
        }
    }
}
