//! JSON snapshot codec for scenes.
//!
//! # Document layout
//!
//! ```json
//! {
//!   "Scene": "Untitled",
//!   "Entities": [
//!     {
//!       "Entity": 12837192831273,
//!       "TagComponent": { "Tag": "Box" },
//!       "TransformComponent": { "Translation": [0, 3, 0], "Rotation": [0, 0, 0], "Scale": [1, 1, 1] },
//!       "SpriteRendererComponent": { "Color": [1, 0, 0, 1], "TexturePath": null, "TilingFactor": 1 },
//!       "Rigidbody2DComponent": { "BodyType": "Dynamic", "FixedRotation": false },
//!       "BoxCollider2DComponent": { "Offset": [0, 0], "Size": [0.5, 0.5], "Density": 1,
//!                                   "Friction": 0.5, "Restitution": 0, "RestitutionThreshold": 0.5 }
//!     }
//!   ]
//! }
//! ```
//!
//! Optional components are written only when present. Missing fields read
//! back as component defaults; a document without `"Scene"` is rejected.
//! Runtime state (physics handles, behavior instances) is never written.
//! Textures travel as paths and scripts as registered names.

use std::fs;
use std::io::Write;
use std::path::Path;

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3, Vec4};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::Scene;
use crate::components::boxcollider::BoxCollider2D;
use crate::components::camera::Camera;
use crate::components::identity::Identity;
use crate::components::nativescript::NativeScript;
use crate::components::rigidbody::{BodyType, RigidBody2D};
use crate::components::spriterenderer::SpriteRenderer;
use crate::components::tag::Tag;
use crate::components::transform::Transform;
use crate::error::SceneError;
use crate::uuid::Uuid;

const ORTHOGRAPHIC_PROJECTION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SceneDocument {
    #[serde(rename = "Scene", default)]
    scene: Option<String>,
    #[serde(rename = "Entities", default)]
    entities: Vec<EntityRecord>,
}

#[derive(Serialize, Deserialize, Default)]
struct EntityRecord {
    #[serde(rename = "Entity", default)]
    entity: Option<u64>,
    #[serde(rename = "TagComponent", default, skip_serializing_if = "Option::is_none")]
    tag: Option<TagRecord>,
    #[serde(rename = "TransformComponent", default, skip_serializing_if = "Option::is_none")]
    transform: Option<TransformRecord>,
    #[serde(rename = "CameraComponent", default, skip_serializing_if = "Option::is_none")]
    camera: Option<CameraRecord>,
    #[serde(rename = "SpriteRendererComponent", default, skip_serializing_if = "Option::is_none")]
    sprite: Option<SpriteRecord>,
    #[serde(rename = "Rigidbody2DComponent", default, skip_serializing_if = "Option::is_none")]
    rigidbody: Option<RigidBodyRecord>,
    #[serde(rename = "BoxCollider2DComponent", default, skip_serializing_if = "Option::is_none")]
    box_collider: Option<BoxColliderRecord>,
    #[serde(rename = "NativeScriptComponent", default, skip_serializing_if = "Option::is_none")]
    script: Option<ScriptRecord>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct TagRecord {
    #[serde(rename = "Tag")]
    tag: String,
}

#[derive(Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct TransformRecord {
    translation: Vec3,
    rotation: Vec3,
    scale: Vec3,
}

impl Default for TransformRecord {
    fn default() -> Self {
        (&Transform::default()).into()
    }
}

impl From<&Transform> for TransformRecord {
    fn from(t: &Transform) -> Self {
        Self {
            translation: t.translation,
            rotation: t.rotation,
            scale: t.scale,
        }
    }
}

impl From<TransformRecord> for Transform {
    fn from(r: TransformRecord) -> Self {
        Transform {
            translation: r.translation,
            rotation: r.rotation,
            scale: r.scale,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ProjectionRecord {
    projection_type: u32,
    orthographic_size: f32,
    orthographic_near: f32,
    orthographic_far: f32,
}

#[derive(Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct CameraRecord {
    camera: ProjectionRecord,
    primary: bool,
    fixed_aspect_ratio: bool,
}

impl Default for CameraRecord {
    fn default() -> Self {
        (&Camera::default()).into()
    }
}

impl Default for ProjectionRecord {
    fn default() -> Self {
        CameraRecord::default().camera
    }
}

impl From<&Camera> for CameraRecord {
    fn from(c: &Camera) -> Self {
        Self {
            camera: ProjectionRecord {
                projection_type: ORTHOGRAPHIC_PROJECTION,
                orthographic_size: c.orthographic_size,
                orthographic_near: c.orthographic_near,
                orthographic_far: c.orthographic_far,
            },
            primary: c.primary,
            fixed_aspect_ratio: c.fixed_aspect_ratio,
        }
    }
}

impl From<CameraRecord> for Camera {
    fn from(r: CameraRecord) -> Self {
        if r.camera.projection_type != ORTHOGRAPHIC_PROJECTION {
            warn!(
                "Projection type {} is not supported, using orthographic",
                r.camera.projection_type
            );
        }
        let mut camera = Camera {
            primary: r.primary,
            fixed_aspect_ratio: r.fixed_aspect_ratio,
            orthographic_size: r.camera.orthographic_size,
            orthographic_near: r.camera.orthographic_near,
            orthographic_far: r.camera.orthographic_far,
            ..Camera::default()
        };
        camera.apply_aspect_ratio(1.0);
        camera
    }
}

#[derive(Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct SpriteRecord {
    color: Vec4,
    texture_path: Option<String>,
    tiling_factor: f32,
}

impl Default for SpriteRecord {
    fn default() -> Self {
        (&SpriteRenderer::default()).into()
    }
}

impl From<&SpriteRenderer> for SpriteRecord {
    fn from(s: &SpriteRenderer) -> Self {
        Self {
            color: s.color,
            texture_path: s
                .texture
                .as_ref()
                .map(|texture| texture.path().to_string_lossy().into_owned()),
            tiling_factor: s.tiling_factor,
        }
    }
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default, rename_all = "PascalCase")]
struct RigidBodyRecord {
    body_type: BodyType,
    fixed_rotation: bool,
}

impl From<&RigidBody2D> for RigidBodyRecord {
    fn from(rb: &RigidBody2D) -> Self {
        Self {
            body_type: rb.body_type,
            fixed_rotation: rb.fixed_rotation,
        }
    }
}

impl From<RigidBodyRecord> for RigidBody2D {
    fn from(r: RigidBodyRecord) -> Self {
        RigidBody2D::new(r.body_type).with_fixed_rotation(r.fixed_rotation)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct BoxColliderRecord {
    offset: Vec2,
    size: Vec2,
    density: f32,
    friction: f32,
    restitution: f32,
    restitution_threshold: f32,
}

impl Default for BoxColliderRecord {
    fn default() -> Self {
        (&BoxCollider2D::default()).into()
    }
}

impl From<&BoxCollider2D> for BoxColliderRecord {
    fn from(c: &BoxCollider2D) -> Self {
        Self {
            offset: c.offset,
            size: c.size,
            density: c.density,
            friction: c.friction,
            restitution: c.restitution,
            restitution_threshold: c.restitution_threshold,
        }
    }
}

impl From<BoxColliderRecord> for BoxCollider2D {
    fn from(r: BoxColliderRecord) -> Self {
        BoxCollider2D {
            offset: r.offset,
            size: r.size,
            density: r.density,
            friction: r.friction,
            restitution: r.restitution,
            restitution_threshold: r.restitution_threshold,
            runtime_collider: None,
        }
    }
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct ScriptRecord {
    #[serde(rename = "Script")]
    script: String,
}

/// Reads and writes scene snapshots.
pub struct SceneSerializer<'a> {
    scene: &'a mut Scene,
}

impl<'a> SceneSerializer<'a> {
    pub fn new(scene: &'a mut Scene) -> Self {
        Self { scene }
    }

    fn record_entity(world: &World, entity: Entity) -> Option<EntityRecord> {
        let identity = world.get::<Identity>(entity)?;
        Some(EntityRecord {
            entity: Some(identity.uuid().as_u64()),
            tag: world.get::<Tag>(entity).map(|tag| TagRecord {
                tag: tag.as_str().to_string(),
            }),
            transform: world.get::<Transform>(entity).map(TransformRecord::from),
            camera: world.get::<Camera>(entity).map(CameraRecord::from),
            sprite: world.get::<SpriteRenderer>(entity).map(SpriteRecord::from),
            rigidbody: world.get::<RigidBody2D>(entity).map(RigidBodyRecord::from),
            box_collider: world
                .get::<BoxCollider2D>(entity)
                .map(BoxColliderRecord::from),
            script: world.get::<NativeScript>(entity).map(|script| ScriptRecord {
                script: script.name().to_string(),
            }),
        })
    }

    fn document(&mut self) -> SceneDocument {
        let entities = self.scene.entities();
        let world = self.scene.world();
        SceneDocument {
            scene: Some(self.scene.name().to_string()),
            entities: entities
                .into_iter()
                .filter_map(|entity| Self::record_entity(world, entity))
                .collect(),
        }
    }

    pub fn serialize_to_string(&mut self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(&self.document())?)
    }

    pub fn serialize_to_writer<W: Write>(&mut self, mut writer: W) -> Result<(), SceneError> {
        serde_json::to_writer_pretty(&mut writer, &self.document())?;
        writer.flush()?;
        Ok(())
    }

    pub fn serialize(&mut self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        fs::write(path, self.serialize_to_string()?)?;
        debug!("Serialized scene '{}' to {:?}", self.scene.name(), path);
        Ok(())
    }

    /// Add the entities of a snapshot to the scene and take its name.
    ///
    /// The document is fully parsed before the scene is touched, so a
    /// malformed snapshot leaves the scene unchanged.
    pub fn deserialize_str(&mut self, text: &str) -> Result<(), SceneError> {
        let document: SceneDocument = serde_json::from_str(text)?;
        let Some(name) = document.scene else {
            return Err(SceneError::InvalidSnapshot(
                "missing \"Scene\" key".to_string(),
            ));
        };

        debug!(
            "Deserializing scene '{}' with {} entities",
            name,
            document.entities.len()
        );
        self.scene.set_name(name);
        for record in document.entities {
            self.apply_record(record);
        }
        Ok(())
    }

    pub fn deserialize(&mut self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let text = fs::read_to_string(path)?;
        self.deserialize_str(&text)
    }

    fn apply_record(&mut self, record: EntityRecord) {
        let uuid = match record.entity {
            Some(value) => Uuid::from_u64(value),
            None => {
                warn!("Snapshot entity without identity, assigning a new one");
                Uuid::new()
            }
        };
        let name = record.tag.map(|tag| tag.tag).unwrap_or_default();

        let texture = record
            .sprite
            .as_ref()
            .and_then(|sprite| sprite.texture_path.as_ref())
            .map(|path| self.scene.textures_mut().load(path));
        let script = record.script.and_then(|record| {
            let resolved = self.scene.scripts().resolve(&record.script);
            if resolved.is_none() {
                warn!("Unknown native script '{}', skipping it", record.script);
            }
            resolved
        });

        let mut entity = self.scene.create_entity_with_uuid(&name, uuid);
        let transform: Transform = record.transform.unwrap_or_default().into();
        if let Ok(t) = entity.get_mut::<Transform>() {
            *t = transform;
        }

        if let Some(camera) = record.camera {
            entity = entity.with(Camera::from(camera));
        }
        if let Some(sprite) = record.sprite {
            entity = entity.with(SpriteRenderer {
                color: sprite.color,
                texture,
                tiling_factor: sprite.tiling_factor,
            });
        }
        if let Some(rigidbody) = record.rigidbody {
            entity = entity.with(RigidBody2D::from(rigidbody));
        }
        if let Some(collider) = record.box_collider {
            entity = entity.with(BoxCollider2D::from(collider));
        }
        if let Some(script) = script {
            entity.with(script);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_missing_scene_key() {
        let mut scene = Scene::new("target");
        let result = SceneSerializer::new(&mut scene).deserialize_str(r#"{ "Entities": [] }"#);
        assert!(matches!(result, Err(SceneError::InvalidSnapshot(_))));
        assert_eq!(scene.name(), "target");
    }

    #[test]
    fn test_malformed_json_leaves_scene_untouched() {
        let mut scene = Scene::new("target");
        scene.create_entity("Existing");
        let result = SceneSerializer::new(&mut scene).deserialize_str("{ not json");
        assert!(matches!(result, Err(SceneError::Json(_))));
        assert_eq!(scene.entity_count(), 1);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let text = r#"{
            "Scene": "Sparse",
            "Entities": [
                {
                    "Entity": 7,
                    "TagComponent": { "Tag": "Crate" },
                    "TransformComponent": { "Translation": [1.0, 2.0, 0.0] },
                    "BoxCollider2DComponent": { "Friction": 0.9 },
                    "Rigidbody2DComponent": {}
                }
            ]
        }"#;
        let mut scene = Scene::new("target");
        SceneSerializer::new(&mut scene).deserialize_str(text).unwrap();
        assert_eq!(scene.name(), "Sparse");

        let entity = scene.find_entity_by_uuid(Uuid::from_u64(7)).unwrap();
        let entity = scene.entity(entity).unwrap();
        assert_eq!(entity.name().unwrap(), "Crate");

        let transform = entity.get::<Transform>().unwrap();
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(transform.scale, Vec3::ONE);

        let collider = entity.get::<BoxCollider2D>().unwrap();
        assert!(approx_eq(collider.friction, 0.9));
        assert!(approx_eq(collider.density, 1.0));
        assert_eq!(collider.size, Vec2::splat(0.5));

        assert_eq!(entity.get::<RigidBody2D>().unwrap().body_type, BodyType::Static);
        assert!(!entity.has::<Camera>());
    }

    #[test]
    fn test_writes_only_present_components() {
        let mut scene = Scene::new("Layout");
        scene
            .create_entity("Plain")
            .with(SpriteRenderer::from_color(Vec4::new(0.0, 1.0, 0.0, 1.0)));
        let text = SceneSerializer::new(&mut scene)
            .serialize_to_string()
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["Scene"], "Layout");
        let entity = &value["Entities"][0];
        assert!(entity["Entity"].is_u64());
        assert_eq!(entity["TagComponent"]["Tag"], "Plain");
        assert!(entity.get("SpriteRendererComponent").is_some());
        assert!(entity.get("CameraComponent").is_none());
        assert!(entity.get("Rigidbody2DComponent").is_none());
    }

    #[test]
    fn test_camera_fields() {
        let mut scene = Scene::new("Cam");
        let mut camera = Camera::with_size(6.0).primary(false);
        camera.fixed_aspect_ratio = true;
        scene.create_entity("Camera").with(camera);
        let text = SceneSerializer::new(&mut scene)
            .serialize_to_string()
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let record = &value["Entities"][0]["CameraComponent"];
        assert_eq!(record["Camera"]["ProjectionType"], 1);
        assert_eq!(record["Camera"]["OrthographicSize"], 6.0);
        assert_eq!(record["Primary"], false);
        assert_eq!(record["FixedAspectRatio"], true);
    }

    #[test]
    fn test_unknown_script_is_skipped() {
        let text = r#"{ "Scene": "S", "Entities": [
            { "Entity": 3, "NativeScriptComponent": { "Script": "does::not::Exist" } }
        ] }"#;
        let mut scene = Scene::new("target");
        SceneSerializer::new(&mut scene).deserialize_str(text).unwrap();
        let entity = scene.find_entity_by_uuid(Uuid::from_u64(3)).unwrap();
        let entity = scene.entity(entity).unwrap();
        assert!(!entity.has::<NativeScript>());
        assert_eq!(entity.name().unwrap(), "Entity");
    }
}
