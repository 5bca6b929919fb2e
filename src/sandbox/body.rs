use super::vec2::Vec2;

pub type BodyId = u32;

/// Semantic role of a control body. Exactly one body holds each of the three
/// mapped roles for the lifetime of the sandbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Volume,
    Brightness,
    Vibrato,
    Decorative,
}

#[derive(Clone, Copy, Debug)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_w: f32, half_h: f32 },
}

impl Shape {
    pub fn half_extents(&self) -> (f32, f32) {
        match *self {
            Shape::Circle { radius } => (radius, radius),
            Shape::Rect { half_w, half_h } => (half_w, half_h),
        }
    }
}

/// How user drags act on a body: reposition it, or spin it about its pivot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movability {
    FreeDrag,
    RotateOnly,
}

/// Rigid body whose live state feeds the parameter mapper.
#[derive(Clone, Debug)]
pub struct ControlBody {
    pub role: Role,
    pub shape: Shape,
    pub pos: Vec2,
    pub velocity: Vec2,
    /// Rotation in radians, unbounded.
    pub angle: f32,
    pub angular_vel: f32,
    pub mass: f32,
    pub restitution: f32,
    pub dynamic: bool,
    pub movability: Movability,
}

impl ControlBody {
    pub fn circle(role: Role, pos: Vec2, radius: f32) -> Self {
        let mass = std::f32::consts::PI * radius * radius;
        Self {
            role,
            shape: Shape::Circle { radius },
            pos,
            velocity: Vec2::zero(),
            angle: 0.0,
            angular_vel: 0.0,
            mass,
            restitution: 0.55,
            dynamic: true,
            movability: Movability::FreeDrag,
        }
    }

    pub fn rect(role: Role, pos: Vec2, half_w: f32, half_h: f32) -> Self {
        let mass = 4.0 * half_w * half_h;
        Self {
            role,
            shape: Shape::Rect { half_w, half_h },
            pos,
            velocity: Vec2::zero(),
            angle: 0.0,
            angular_vel: 0.0,
            mass,
            restitution: 0.55,
            dynamic: true,
            movability: Movability::FreeDrag,
        }
    }

    pub fn rotate_only(mut self) -> Self {
        self.movability = Movability::RotateOnly;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.dynamic = false;
        self
    }

    pub fn with_restitution(mut self, r: f32) -> Self {
        self.restitution = r.clamp(0.0, 1.0);
        self
    }
}
