use super::body::{BodyId, ControlBody};
use super::vec2::Vec2;
use super::Bounds;

/// Kinematic read-back for one body, sampled once per control frame.
#[derive(Clone, Copy, Debug)]
pub struct BodyState {
    pub position: Vec2,
    pub rotation: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
}

/// Boundary contract with the rigid-body simulation. The sandbox drives it
/// with a fixed step; a stale handle is a programming error and panics.
pub trait RigidBodyEngine: Send {
    fn spawn(&mut self, body: ControlBody) -> BodyId;
    /// Pin a body in place with a frictionless rotational joint: position is
    /// held, rotation keeps integrating.
    fn pin(&mut self, id: BodyId, pivot: Vec2);
    fn step(&mut self, dt: f32);
    fn state(&self, id: BodyId) -> BodyState;
    fn half_extents(&self, id: BodyId) -> (f32, f32);
    fn set_position(&mut self, id: BodyId, p: Vec2);
    fn set_velocity(&mut self, id: BodyId, v: Vec2);
    fn set_angular_velocity(&mut self, id: BodyId, w: f32);
    fn set_dynamic(&mut self, id: BodyId, dynamic: bool);
    fn set_restitution(&mut self, id: BodyId, r: f32);
}

struct Slot {
    body: ControlBody,
    pivot: Option<Vec2>,
}

/// Built-in integrator: semi-implicit Euler with inelastic wall reflection.
/// Body-body collision is left to a real engine behind the same trait.
pub struct ImpulseEngine {
    slots: Vec<Slot>,
    bounds: Bounds,
    gravity: f32,
}

impl ImpulseEngine {
    pub fn new(bounds: Bounds, gravity: f32) -> Self {
        Self {
            slots: Vec::new(),
            bounds,
            gravity,
        }
    }

    fn slot(&self, id: BodyId) -> &Slot {
        self.slots.get(id as usize).expect("stale body handle")
    }

    fn slot_mut(&mut self, id: BodyId) -> &mut Slot {
        self.slots.get_mut(id as usize).expect("stale body handle")
    }
}

impl RigidBodyEngine for ImpulseEngine {
    fn spawn(&mut self, body: ControlBody) -> BodyId {
        let id = self.slots.len() as BodyId;
        self.slots.push(Slot { body, pivot: None });
        id
    }

    fn pin(&mut self, id: BodyId, pivot: Vec2) {
        let slot = self.slot_mut(id);
        slot.body.pos = pivot;
        slot.body.velocity = Vec2::zero();
        slot.pivot = Some(pivot);
    }

    fn step(&mut self, dt: f32) {
        let bounds = self.bounds;
        let gravity = self.gravity;
        for slot in &mut self.slots {
            let body = &mut slot.body;
            if !body.dynamic {
                continue;
            }
            if let Some(pivot) = slot.pivot {
                // Frictionless joint: the pin carries the weight, spin persists.
                body.pos = pivot;
                body.velocity = Vec2::zero();
                body.angle += body.angular_vel * dt;
                continue;
            }

            body.velocity.y -= gravity * dt;
            body.pos = body.pos + body.velocity * dt;
            body.angle += body.angular_vel * dt;

            let (hw, hh) = body.shape.half_extents();
            if body.pos.x - hw < -bounds.half_w {
                body.pos.x = -bounds.half_w + hw;
                body.velocity.x = -body.velocity.x * body.restitution;
            } else if body.pos.x + hw > bounds.half_w {
                body.pos.x = bounds.half_w - hw;
                body.velocity.x = -body.velocity.x * body.restitution;
            }
            if body.pos.y - hh < -bounds.half_h {
                body.pos.y = -bounds.half_h + hh;
                body.velocity.y = -body.velocity.y * body.restitution;
            } else if body.pos.y + hh > bounds.half_h {
                body.pos.y = bounds.half_h - hh;
                body.velocity.y = -body.velocity.y * body.restitution;
            }
        }
    }

    fn state(&self, id: BodyId) -> BodyState {
        let body = &self.slot(id).body;
        BodyState {
            position: body.pos,
            rotation: body.angle,
            linear_velocity: body.velocity,
            angular_velocity: body.angular_vel,
        }
    }

    fn half_extents(&self, id: BodyId) -> (f32, f32) {
        self.slot(id).body.shape.half_extents()
    }

    fn set_position(&mut self, id: BodyId, p: Vec2) {
        self.slot_mut(id).body.pos = p;
    }

    fn set_velocity(&mut self, id: BodyId, v: Vec2) {
        self.slot_mut(id).body.velocity = v;
    }

    fn set_angular_velocity(&mut self, id: BodyId, w: f32) {
        self.slot_mut(id).body.angular_vel = w;
    }

    fn set_dynamic(&mut self, id: BodyId, dynamic: bool) {
        self.slot_mut(id).body.dynamic = dynamic;
    }

    fn set_restitution(&mut self, id: BodyId, r: f32) {
        self.slot_mut(id).body.restitution = r.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::body::Role;

    fn engine() -> ImpulseEngine {
        ImpulseEngine::new(
            Bounds {
                half_w: 100.0,
                half_h: 100.0,
            },
            0.0,
        )
    }

    #[test]
    fn bodies_stay_inside_bounds() {
        let mut eng = engine();
        let mut ball = ControlBody::circle(Role::Decorative, Vec2::new(90.0, 0.0), 10.0);
        ball.velocity = Vec2::new(500.0, 0.0);
        let id = eng.spawn(ball);
        for _ in 0..600 {
            eng.step(1.0 / 60.0);
            let s = eng.state(id);
            assert!(s.position.x.abs() <= 90.0 + 1e-3);
            assert!(s.position.y.abs() <= 90.0 + 1e-3);
        }
    }

    #[test]
    fn wall_reflection_scales_by_restitution() {
        let mut eng = engine();
        let mut ball = ControlBody::circle(Role::Decorative, Vec2::new(85.0, 0.0), 10.0);
        ball.velocity = Vec2::new(600.0, 0.0);
        ball.restitution = 0.5;
        let id = eng.spawn(ball);
        eng.step(1.0 / 60.0);
        let s = eng.state(id);
        assert!(s.linear_velocity.x < 0.0, "should have reflected");
        assert!((s.linear_velocity.x + 300.0).abs() < 1e-3);
    }

    #[test]
    fn pinned_body_spins_in_place() {
        let mut eng = engine();
        let wheel =
            ControlBody::circle(Role::Vibrato, Vec2::new(0.0, -50.0), 48.0).rotate_only();
        let id = eng.spawn(wheel);
        eng.pin(id, Vec2::new(0.0, -50.0));
        eng.set_angular_velocity(id, 2.0);
        for _ in 0..60 {
            eng.step(1.0 / 60.0);
        }
        let s = eng.state(id);
        assert_eq!(s.position, Vec2::new(0.0, -50.0));
        assert!((s.rotation - 2.0).abs() < 1e-3);
    }

    #[test]
    fn non_dynamic_body_ignores_gravity() {
        let mut eng = ImpulseEngine::new(
            Bounds {
                half_w: 100.0,
                half_h: 100.0,
            },
            600.0,
        );
        let marker = ControlBody::circle(Role::Decorative, Vec2::new(0.0, 0.0), 5.0).fixed();
        let id = eng.spawn(marker);
        for _ in 0..60 {
            eng.step(1.0 / 60.0);
        }
        assert_eq!(eng.state(id).position, Vec2::zero());
    }
}
