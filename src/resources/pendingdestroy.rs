use bevy_ecs::prelude::{Entity, Resource};

/// Entities scripts asked to destroy during the current tick.
///
/// Scripts never despawn directly; the scene drains this queue after the
/// scripts ran so its uuid lookup and the physics world stay in step.
#[derive(Resource, Clone, Debug, Default)]
pub struct PendingDestroy {
    entities: Vec<Entity>,
}

impl PendingDestroy {
    /// Queue `entity`. Queuing it twice is harmless.
    pub fn push(&mut self, entity: Entity) {
        if !self.entities.contains(&entity) {
            self.entities.push(entity);
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Empty the queue, returning entities in request order.
    pub fn take(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.entities)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
