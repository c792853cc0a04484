use bevy_ecs::prelude::Component;

use crate::uuid::Uuid;

/// Durable identity of an entity, assigned at creation and never changed.
///
/// Immutable: the uuid → entity lookup of a scene relies on it.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[component(immutable)]
pub struct Identity(Uuid);

impl Identity {
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    #[test]
    fn test_identity_is_immutable_component() {
        let mut world = World::new();
        let id = world.register_component::<Identity>();
        let info = world.components().get_info(id).unwrap();
        assert!(!info.mutable());
    }

    #[test]
    fn test_identity_keeps_uuid() {
        let uuid = Uuid::from_u64(77);
        assert_eq!(Identity::new(uuid).uuid(), uuid);
    }
}
