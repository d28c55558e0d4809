//! Generators: spawn moveable shapes at timed intervals

use super::{frames, layout, point, stored_center, ObjectKind};
use crate::core::{Attr, GameObject, Point};

/// Generator schedule, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// How long each spawned shape exists
    pub disappear_after: f64,
    /// Pause between a shape disappearing and the next spawn
    pub wait_between: f64,
    /// Delay before the first spawn
    pub initial_delay: f64,
}

impl Timing {
    pub fn new(disappear_after: f64, wait_between: f64, initial_delay: f64) -> Self {
        Timing {
            disappear_after,
            wait_between,
            initial_delay,
        }
    }

    fn frames(&self) -> [Attr; 3] {
        [
            frames(self.disappear_after),
            frames(self.wait_between),
            frames(self.initial_delay),
        ]
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing::new(5.0, 1.0, 0.0)
    }
}

/// Shared generator switches
fn push_flags(obj: &mut GameObject, fix_rotation: bool, no_fade: bool, start_off: bool) {
    if fix_rotation {
        obj.add_modifier("fixrot");
    }
    if no_fade {
        obj.add_modifier("noanim");
    }
    if start_off {
        obj.add_modifier("off");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BallGenerator {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// 0 spawns solid circles
    pub density: f64,
    pub timing: Timing,
    pub damping: f64,
    /// Disable the fade animation
    pub no_fade: bool,
    /// Wait for a special connection before generating
    pub start_off: bool,
}

impl BallGenerator {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        BallGenerator {
            x,
            y,
            radius,
            density: 1.0,
            timing: Timing::default(),
            damping: 0.0,
            no_fade: false,
            start_off: false,
        }
    }
}

impl From<BallGenerator> for GameObject {
    fn from(g: BallGenerator) -> Self {
        let attrs = [g.x, g.y, g.radius, g.density]
            .map(Attr::num)
            .into_iter()
            .chain(g.timing.frames());
        let mut obj = layout(ObjectKind::BallGenerator, attrs);
        if g.damping != 0.0 {
            obj.add_modifier(format!("damping {}", Attr::num(g.damping)));
        }
        push_flags(&mut obj, false, g.no_fade, g.start_off);
        obj
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectangleGenerator {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub density: f64,
    pub rotation: f64,
    pub damping: f64,
    pub timing: Timing,
    pub fix_rotation: bool,
    pub no_fade: bool,
    pub start_off: bool,
    pub from_corner: bool,
}

impl RectangleGenerator {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        RectangleGenerator {
            x,
            y,
            width,
            height,
            density: 1.0,
            rotation: 0.0,
            damping: 0.0,
            timing: Timing::default(),
            fix_rotation: false,
            no_fade: false,
            start_off: false,
            from_corner: false,
        }
    }
}

impl From<RectangleGenerator> for GameObject {
    fn from(g: RectangleGenerator) -> Self {
        let kind = ObjectKind::RectangleGenerator;
        let (x, y) = stored_center(kind, g.x, g.y, g.width, g.height, g.from_corner);
        let attrs = [x, y, g.width, g.height, g.density, g.damping, g.rotation, g.damping]
            .map(Attr::num)
            .into_iter()
            .chain(g.timing.frames());
        let mut obj = layout(kind, attrs);
        push_flags(&mut obj, g.fix_rotation, g.no_fade, g.start_off);
        obj
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriangleGenerator {
    pub points: [Point; 3],
    pub density: f64,
    pub timing: Timing,
    pub fix_rotation: bool,
    pub no_fade: bool,
    pub start_off: bool,
}

impl TriangleGenerator {
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        TriangleGenerator {
            points: [a, b, c],
            density: 1.0,
            timing: Timing::default(),
            fix_rotation: false,
            no_fade: false,
            start_off: false,
        }
    }
}

impl From<TriangleGenerator> for GameObject {
    fn from(g: TriangleGenerator) -> Self {
        // The two -1 literals after the density have no known meaning
        let attrs = g
            .points
            .into_iter()
            .flat_map(point)
            .chain([Attr::num(g.density), Attr::Int(-1), Attr::Int(-1)])
            .chain(g.timing.frames());
        let mut obj = layout(ObjectKind::TriangleGenerator, attrs);
        push_flags(&mut obj, g.fix_rotation, g.no_fade, g.start_off);
        obj
    }
}
