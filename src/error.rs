//! Error type shared by the scene store, the snapshot codec and the play/edit
//! session.

use bevy_ecs::entity::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    /// A component was requested from an entity that does not carry it.
    /// Callers are expected to check `has` first.
    #[error("entity {entity} does not have component {component}")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("entity {0} does not exist in this scene")]
    NoSuchEntity(Entity),

    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl SceneError {
    pub(crate) fn missing<T>(entity: Entity) -> Self {
        SceneError::MissingComponent {
            entity,
            component: std::any::type_name::<T>(),
        }
    }
}
