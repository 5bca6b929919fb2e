use serde::{Deserialize, Serialize};

use crate::sandbox::{BodyId, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ButtonId {
    OctaveUp,
    OctaveDown,
    MultiplierUp,
    MultiplierDown,
}

/// Discrete events delivered by the input layer. Keys are indices 0-11
/// within the current octave; drag events carry the target body handle and
/// the pointer position in sandbox coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InputEvent {
    KeyDown { key: u8 },
    KeyUp { key: u8 },
    ButtonPress { button: ButtonId },
    DragStart { body: BodyId, point: Vec2 },
    DragMove { body: BodyId, point: Vec2 },
    DragEnd { body: BodyId, point: Vec2 },
}
