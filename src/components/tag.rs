use bevy_ecs::prelude::Component;

/// Display name of an entity. Not required to be unique.
#[derive(Component, Clone, Debug, PartialEq, Eq, Default)]
pub struct Tag(pub String);

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
