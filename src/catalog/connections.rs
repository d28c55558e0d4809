//! Connections between two objects
//!
//! Endpoints are held as [`ObjectKey`]s and resolved to positional ids only
//! when the owning level is serialized. Anything that converts into a key
//! works as an endpoint: a `&GameObject`, the `ObjectHandle` returned by
//! `Level::add`, or the key itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{flag, layout, point, ObjectKind};
use crate::core::{Attr, GameObject, ObjectKey, Point};
use crate::LevelError;

fn connected(mut obj: GameObject, a: ObjectKey, b: ObjectKey) -> GameObject {
    obj.connect(a, b);
    obj
}

/// Glues two moveable objects together
#[derive(Debug, Clone, PartialEq)]
pub struct Glue {
    pub a: ObjectKey,
    pub b: ObjectKey,
}

impl Glue {
    pub fn new(a: impl Into<ObjectKey>, b: impl Into<ObjectKey>) -> Self {
        Glue {
            a: a.into(),
            b: b.into(),
        }
    }
}

impl From<Glue> for GameObject {
    fn from(g: Glue) -> Self {
        connected(layout(ObjectKind::Glue, std::iter::empty::<Attr>()), g.a, g.b)
    }
}

/// Lets two objects move semi-independently
#[derive(Debug, Clone, PartialEq)]
pub struct Rope {
    pub a: ObjectKey,
    pub b: ObjectKey,
    pub offset_a: Point,
    pub offset_b: Point,
    /// Slack beyond the distance between the endpoints
    pub max_length: f64,
}

impl Rope {
    pub fn new(a: impl Into<ObjectKey>, b: impl Into<ObjectKey>) -> Self {
        Rope {
            a: a.into(),
            b: b.into(),
            offset_a: (0.0, 0.0),
            offset_b: (0.0, 0.0),
            max_length: 0.0,
        }
    }
}

impl From<Rope> for GameObject {
    fn from(r: Rope) -> Self {
        let attrs = point(r.offset_a)
            .into_iter()
            .chain(point(r.offset_b))
            .chain([Attr::num(r.max_length)]);
        connected(layout(ObjectKind::Rope, attrs), r.a, r.b)
    }
}

/// Rope between a portal and another object
#[derive(Debug, Clone, PartialEq)]
pub struct FixedDistanceConnection {
    pub portal: ObjectKey,
    pub other: ObjectKey,
    /// Move the portal's destination along with it
    pub also_move_destination: bool,
}

impl FixedDistanceConnection {
    pub fn new(portal: impl Into<ObjectKey>, other: impl Into<ObjectKey>) -> Self {
        FixedDistanceConnection {
            portal: portal.into(),
            other: other.into(),
            also_move_destination: false,
        }
    }
}

impl From<FixedDistanceConnection> for GameObject {
    fn from(c: FixedDistanceConnection) -> Self {
        let obj = layout(
            ObjectKind::FixedDistanceConnection,
            [flag(c.also_move_destination)],
        );
        connected(obj, c.portal, c.other)
    }
}

/// Pulley system between two objects
///
/// Pulley positions are relative to their object. The connection offsets
/// are not exposed by the game editor and misbehave when non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Pulley {
    pub a: ObjectKey,
    pub b: ObjectKey,
    pub pulley_a: Point,
    pub pulley_b: Point,
    pub offset_a: Point,
    pub offset_b: Point,
    /// Pull of the second side relative to the first
    pub ratio: f64,
    /// Allow horizontal movement of the pulleys
    pub unlock_movement: bool,
}

impl Pulley {
    pub fn new(a: impl Into<ObjectKey>, b: impl Into<ObjectKey>) -> Self {
        Pulley {
            a: a.into(),
            b: b.into(),
            pulley_a: (0.0, -100.0),
            pulley_b: (0.0, -100.0),
            offset_a: (0.0, 0.0),
            offset_b: (0.0, 0.0),
            ratio: 1.0,
            unlock_movement: false,
        }
    }
}

impl From<Pulley> for GameObject {
    fn from(p: Pulley) -> Self {
        let attrs = [p.offset_a, p.offset_b, p.pulley_a, p.pulley_b]
            .into_iter()
            .flat_map(point)
            .chain([Attr::num(p.ratio)]);
        let mut obj = layout(ObjectKind::Pulley, attrs);
        if p.unlock_movement {
            obj.add_modifier("p_free_hmovement");
        }
        connected(obj, p.a, p.b)
    }
}

/// Rigid connection that still allows rotation
#[derive(Debug, Clone, PartialEq)]
pub struct Hinge {
    pub a: ObjectKey,
    pub b: ObjectKey,
    /// Pivot offset from `a`
    pub offset: Point,
    pub draw_line: bool,
    /// Let the two objects collide with each other
    pub collide: bool,
    pub motor_speed: f64,
    pub torque: f64,
}

impl Hinge {
    pub fn new(a: impl Into<ObjectKey>, b: impl Into<ObjectKey>) -> Self {
        Hinge {
            a: a.into(),
            b: b.into(),
            offset: (0.0, 0.0),
            draw_line: false,
            collide: false,
            motor_speed: 0.0,
            torque: 100.0,
        }
    }
}

impl From<Hinge> for GameObject {
    fn from(h: Hinge) -> Self {
        let attrs = point(h.offset).into_iter().chain([
            flag(h.draw_line),
            flag(h.collide),
            Attr::num(h.motor_speed),
            Attr::num(h.torque),
        ]);
        connected(layout(ObjectKind::Hinge, attrs), h.a, h.b)
    }
}

/// Rigid connection that allows movement along the line between the objects
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub a: ObjectKey,
    pub b: ObjectKey,
    pub offset: Point,
}

impl Slider {
    pub fn new(a: impl Into<ObjectKey>, b: impl Into<ObjectKey>) -> Self {
        Slider {
            a: a.into(),
            b: b.into(),
            offset: (0.0, 0.0),
        }
    }
}

impl From<Slider> for GameObject {
    fn from(s: Slider) -> Self {
        // Leading literals are written exactly as the editor does
        let attrs = [Attr::Float(1.0), Attr::Float(-0.0), Attr::Int(-1), Attr::Int(-1)]
            .into_iter()
            .chain(point(s.offset));
        connected(layout(ObjectKind::Slider, attrs), s.a, s.b)
    }
}

/// What a special connection does to its target when the collectable is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAction {
    /// Disconnect ropes and hinges
    Disconnect,
    /// Camera follows the target
    Follow,
    /// Enable and reset a generator's timer
    Reset,
    /// Generate one object now
    Now,
    NowIf,
    /// Enable a generator or portal
    On,
    /// Disable a generator or portal
    Off,
    /// Send the player to the connected portal's end point
    Teleport,
    Destroy,
    Deactivate,
    Reactivate,
}

impl SpecialAction {
    pub const ALL: [SpecialAction; 11] = [
        SpecialAction::Disconnect,
        SpecialAction::Follow,
        SpecialAction::Reset,
        SpecialAction::Now,
        SpecialAction::NowIf,
        SpecialAction::On,
        SpecialAction::Off,
        SpecialAction::Teleport,
        SpecialAction::Destroy,
        SpecialAction::Deactivate,
        SpecialAction::Reactivate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialAction::Disconnect => "Disconnect",
            SpecialAction::Follow => "Follow",
            SpecialAction::Reset => "Reset",
            SpecialAction::Now => "Now",
            SpecialAction::NowIf => "NowIf",
            SpecialAction::On => "On",
            SpecialAction::Off => "Off",
            SpecialAction::Teleport => "Teleport",
            SpecialAction::Destroy => "Destroy",
            SpecialAction::Deactivate => "Deactivate",
            SpecialAction::Reactivate => "Reactivate",
        }
    }
}

impl fmt::Display for SpecialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecialAction {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpecialAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| LevelError::ParseError(format!("Unknown special action: {}", s)))
    }
}

/// Performs `action` on `target` when `collectable` is collected
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialConnection {
    pub collectable: ObjectKey,
    pub target: ObjectKey,
    pub action: SpecialAction,
}

impl SpecialConnection {
    pub fn new(
        collectable: impl Into<ObjectKey>,
        target: impl Into<ObjectKey>,
        action: SpecialAction,
    ) -> Self {
        SpecialConnection {
            collectable: collectable.into(),
            target: target.into(),
            action,
        }
    }
}

impl From<SpecialConnection> for GameObject {
    fn from(c: SpecialConnection) -> Self {
        let obj = layout(ObjectKind::SpecialConnection, [Attr::text(c.action.as_str())]);
        connected(obj, c.collectable, c.target)
    }
}
