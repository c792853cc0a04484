//! Physics world resource backed by rapier2d.
//!
//! [`PhysicsWorld2D`] exists in a scene's ECS world only while the simulation
//! runs. It exclusively owns every body and collider; components reference
//! them through rapier handles which become meaningless once the resource is
//! removed.
//!
//! Bodies and fixtures are created from declarative definitions
//! ([`BodyDefinition`], [`BoxFixtureDefinition`]) so the ECS side never has
//! to know the engine's builder API.

use std::num::NonZeroUsize;

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use log::debug;
use rapier2d::prelude::{
    CCDSolver, ColliderBuilder, ColliderHandle, ColliderSet, DefaultBroadPhase,
    ImpulseJointSet, IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase,
    PhysicsPipeline, QueryPipeline, Real, RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
    RigidBodyType, Vector,
};

use crate::components::rigidbody::BodyType;

pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -9.8);
pub const DEFAULT_VELOCITY_ITERATIONS: usize = 6;
pub const DEFAULT_POSITION_ITERATIONS: usize = 2;

/// Tunables used when a physics world is created.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct PhysicsSettings {
    pub gravity: Vec2,
    /// Solver iterations spent on velocities each step.
    pub velocity_iterations: usize,
    /// Extra iterations spent resolving penetration each step.
    pub position_iterations: usize,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            velocity_iterations: DEFAULT_VELOCITY_ITERATIONS,
            position_iterations: DEFAULT_POSITION_ITERATIONS,
        }
    }
}

/// Everything needed to create a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDefinition {
    pub body_type: BodyType,
    pub position: Vec2,
    /// Angle in radians.
    pub angle: f32,
    pub fixed_rotation: bool,
}

/// Everything needed to attach a box fixture to a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxFixtureDefinition {
    pub half_extents: Vec2,
    pub offset: Vec2,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Kept for parity with the authoring data; rapier has no per-fixture
    /// restitution threshold.
    pub restitution_threshold: f32,
}

#[derive(Resource)]
pub struct PhysicsWorld2D {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld2D {
    pub fn new(settings: &PhysicsSettings) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.num_solver_iterations =
            NonZeroUsize::new(settings.velocity_iterations).unwrap_or(NonZeroUsize::MIN);
        integration_parameters.num_internal_pgs_iterations = settings.position_iterations.max(1);

        debug!(
            "Creating physics world: gravity=({}, {}), iterations={}/{}",
            settings.gravity.x,
            settings.gravity.y,
            settings.velocity_iterations,
            settings.position_iterations
        );

        Self {
            gravity: Vector::new(settings.gravity.x, settings.gravity.y),
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity.x, self.gravity.y)
    }

    pub fn create_body(&mut self, definition: &BodyDefinition) -> RigidBodyHandle {
        let body_type = match definition.body_type {
            BodyType::Static => RigidBodyType::Fixed,
            BodyType::Kinematic => RigidBodyType::KinematicVelocityBased,
            BodyType::Dynamic => RigidBodyType::Dynamic,
        };

        let mut builder = RigidBodyBuilder::new(body_type)
            .translation(Vector::new(definition.position.x, definition.position.y))
            .rotation(definition.angle);
        if definition.fixed_rotation {
            builder = builder.lock_rotations();
        }

        self.bodies.insert(builder.build())
    }

    pub fn create_box_fixture(
        &mut self,
        body: RigidBodyHandle,
        definition: &BoxFixtureDefinition,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(definition.half_extents.x, definition.half_extents.y)
            .translation(Vector::new(definition.offset.x, definition.offset.y))
            .density(definition.density)
            .friction(definition.friction)
            .restitution(definition.restitution)
            .build();

        self.colliders
            .insert_with_parent(collider, body, &mut self.bodies)
    }

    /// Destroy a body and every fixture attached to it. Unknown handles are ignored.
    pub fn remove_body(&mut self, body: RigidBodyHandle) {
        self.bodies.remove(
            body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Destroy one fixture, leaving its body in place. Unknown handles are ignored.
    pub fn remove_collider(&mut self, collider: ColliderHandle) {
        self.colliders
            .remove(collider, &mut self.islands, &mut self.bodies, true);
    }

    /// Advance the simulation by `dt` seconds. Non-positive steps are skipped.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Position and angle (radians) of a body.
    pub fn body_pose(&self, body: RigidBodyHandle) -> Option<(Vec2, f32)> {
        self.bodies.get(body).map(|rb| {
            let translation = rb.translation();
            (Vec2::new(translation.x, translation.y), rb.rotation().angle())
        })
    }

    pub fn contains_body(&self, body: RigidBodyHandle) -> bool {
        self.bodies.contains(body)
    }

    pub fn contains_collider(&self, collider: ColliderHandle) -> bool {
        self.colliders.contains(collider)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}
