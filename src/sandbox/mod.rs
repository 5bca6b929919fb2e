pub mod body;
pub mod engine;
pub mod vec2;

pub use body::{BodyId, ControlBody, Movability, Role, Shape};
pub use engine::{BodyState, ImpulseEngine, RigidBodyEngine};
pub use vec2::Vec2;

use crate::config::SandboxConfig;

/// Outer boundary of the sandbox, centered at the origin.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub half_w: f32,
    pub half_h: f32,
}

impl Bounds {
    pub fn contains(&self, p: Vec2, half_w: f32, half_h: f32) -> bool {
        p.x - half_w >= -self.half_w
            && p.x + half_w <= self.half_w
            && p.y - half_h >= -self.half_h
            && p.y + half_h <= self.half_h
    }
}

/// Typed registry of the mapped control bodies.
#[derive(Clone, Copy, Debug)]
pub struct RoleMap {
    pub volume: BodyId,
    pub brightness: BodyId,
    pub vibrato: BodyId,
}

#[derive(Clone, Copy, Debug)]
struct DragState {
    body: BodyId,
    previous: Vec2,
    current: Vec2,
}

/// Owns the control bodies and evolves them through the rigid-body engine.
///
/// Drag handling converts the final frame of pointer motion into a throw:
/// linear velocity = displacement x frame rate, angular velocity =
/// angle delta x frame rate.
pub struct PhysicsSandbox {
    engine: Box<dyn RigidBodyEngine>,
    bounds: Bounds,
    roles: RoleMap,
    anchor: BodyId,
    decorative: Vec<BodyId>,
    movability: Vec<Movability>,
    wheel_pivot: Vec2,
    anchor_offset: f32,
    anchor_range: f32,
    frame_hz: f32,
    drag: Option<DragState>,
}

impl PhysicsSandbox {
    pub fn new(cfg: &SandboxConfig, frame_hz: f32) -> Self {
        let bounds = Bounds {
            half_w: cfg.width * 0.5,
            half_h: cfg.height * 0.5,
        };
        let engine = Box::new(ImpulseEngine::new(bounds, cfg.gravity));
        Self::with_engine(cfg, frame_hz, engine)
    }

    pub fn with_engine(
        cfg: &SandboxConfig,
        frame_hz: f32,
        mut engine: Box<dyn RigidBodyEngine>,
    ) -> Self {
        let bounds = Bounds {
            half_w: cfg.width * 0.5,
            half_h: cfg.height * 0.5,
        };
        let r = cfg.default_restitution;
        let mut movability = Vec::new();
        let mut spawn = |engine: &mut Box<dyn RigidBodyEngine>, body: ControlBody| -> BodyId {
            movability.push(body.movability);
            engine.spawn(body)
        };

        let volume = spawn(
            &mut engine,
            ControlBody::circle(Role::Volume, Vec2::new(-bounds.half_w * 0.5, 0.0), 24.0)
                .with_restitution(r),
        );
        let brightness = spawn(
            &mut engine,
            ControlBody::rect(Role::Brightness, Vec2::new(bounds.half_w * 0.5, 0.0), 20.0, 20.0)
                .with_restitution(r),
        );
        let wheel_pivot = Vec2::new(0.0, -bounds.half_h * 0.5);
        let vibrato = spawn(
            &mut engine,
            ControlBody::circle(Role::Vibrato, wheel_pivot, 48.0).rotate_only(),
        );
        engine.pin(vibrato, wheel_pivot);
        let anchor = spawn(
            &mut engine,
            ControlBody::circle(Role::Decorative, wheel_pivot, 8.0).fixed(),
        );
        let ball = spawn(
            &mut engine,
            ControlBody::circle(Role::Decorative, Vec2::new(0.0, bounds.half_h * 0.5), 16.0)
                .with_restitution(r),
        );

        Self {
            engine,
            bounds,
            roles: RoleMap {
                volume,
                brightness,
                vibrato,
            },
            anchor,
            decorative: vec![ball],
            movability,
            wheel_pivot,
            anchor_offset: 0.0,
            anchor_range: cfg.anchor_range.max(1.0),
            frame_hz,
            drag: None,
        }
    }

    /// Step the simulation by one fixed control frame.
    pub fn advance(&mut self, dt: f32) {
        self.engine.step(dt);
    }

    pub fn state(&self, id: BodyId) -> BodyState {
        self.engine.state(id)
    }

    pub fn roles(&self) -> RoleMap {
        self.roles
    }

    pub fn anchor_id(&self) -> BodyId {
        self.anchor
    }

    pub fn decorative_ids(&self) -> &[BodyId] {
        &self.decorative
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_velocity(&mut self, id: BodyId, v: Vec2) {
        self.engine.set_velocity(id, v);
    }

    pub fn set_angular_velocity(&mut self, id: BodyId, w: f32) {
        self.engine.set_angular_velocity(id, w);
    }

    pub fn set_restitution(&mut self, id: BodyId, r: f32) {
        self.engine.set_restitution(id, r);
    }

    /// Reposition a body. A move that would leave the boundary is rejected
    /// outright, leaving the position unchanged; returns whether it applied.
    pub fn set_position(&mut self, id: BodyId, p: Vec2) -> bool {
        let (hw, hh) = self.engine.half_extents(id);
        if !self.bounds.contains(p, hw, hh) {
            return false;
        }
        self.engine.set_position(id, p);
        true
    }

    /// Horizontal anchor travel, clamped into the configured range.
    pub fn set_anchor_offset(&mut self, offset: f32) {
        self.anchor_offset = offset.clamp(0.0, self.anchor_range);
        let p = self.wheel_pivot + Vec2::new(self.anchor_offset, 0.0);
        self.engine.set_position(self.anchor, p);
    }

    pub fn anchor_offset_norm(&self) -> f32 {
        self.anchor_offset / self.anchor_range
    }

    pub fn drag_begin(&mut self, id: BodyId, point: Vec2) {
        if id == self.anchor {
            self.drag = Some(DragState {
                body: id,
                previous: point,
                current: point,
            });
            return;
        }
        match self.movability_of(id) {
            Movability::FreeDrag => {
                self.engine.set_velocity(id, Vec2::zero());
                self.engine.set_angular_velocity(id, 0.0);
                self.engine.set_dynamic(id, false);
            }
            Movability::RotateOnly => {
                self.engine.set_angular_velocity(id, 0.0);
            }
        }
        self.drag = Some(DragState {
            body: id,
            previous: point,
            current: point,
        });
    }

    pub fn drag_move(&mut self, id: BodyId, point: Vec2) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if drag.body != id {
            return;
        }
        drag.previous = drag.current;
        drag.current = point;
        let (previous, current) = (drag.previous, drag.current);

        if id == self.anchor {
            self.set_anchor_offset(point.x - self.wheel_pivot.x);
            return;
        }
        match self.movability_of(id) {
            Movability::FreeDrag => {
                let _ = self.set_position(id, point);
            }
            Movability::RotateOnly => {
                let w = angle_delta(previous, current, self.wheel_pivot) * self.frame_hz;
                self.engine.set_angular_velocity(id, w);
            }
        }
    }

    pub fn drag_end(&mut self, id: BodyId, point: Vec2) {
        let Some(mut drag) = self.drag.take() else {
            return;
        };
        if drag.body != id {
            self.drag = Some(drag);
            return;
        }
        if point != drag.current {
            drag.previous = drag.current;
            drag.current = point;
        }
        if id == self.anchor {
            return;
        }
        match self.movability_of(id) {
            Movability::FreeDrag => {
                self.engine.set_dynamic(id, true);
                let throw = (drag.current - drag.previous) * self.frame_hz;
                self.engine.set_velocity(id, throw);
            }
            Movability::RotateOnly => {
                let w = angle_delta(drag.previous, drag.current, self.wheel_pivot) * self.frame_hz;
                self.engine.set_angular_velocity(id, w);
            }
        }
    }

    fn movability_of(&self, id: BodyId) -> Movability {
        *self
            .movability
            .get(id as usize)
            .expect("stale body handle")
    }
}

/// Signed rotation from `p0` to `p1` about pivot `c`.
///
/// Crossing the atan2 branch cut yields one large single-frame delta; that is
/// a known limitation of the drag feel and is deliberately not corrected.
pub fn angle_delta(p0: Vec2, p1: Vec2, c: Vec2) -> f32 {
    (p0.x - c.x).atan2(p0.y - c.y) - (p1.x - c.x).atan2(p1.y - c.y)
}
