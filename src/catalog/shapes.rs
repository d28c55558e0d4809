//! Players, solid, growing, moveable and rotating shapes, and portals
//!
//! Rectangle extents are half of the displayed size (measured out from the
//! center), except for [`RotatableRectangle`], which stores full extents.
//! "Movable" is spelled "moveable" throughout the game, and here too.

use super::{layout, point, stored_center, ObjectKind};
use crate::core::{Attr, GameObject, Point};

/// The circle the player steers
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    /// How strongly gravity affects the player
    pub density: f64,
    /// Improves high-speed physics
    pub bullet: bool,
}

impl Player {
    pub fn new(x: f64, y: f64) -> Self {
        Player {
            x,
            y,
            size: 1.0,
            speed: 1.0,
            density: 1.0,
            bullet: true,
        }
    }
}

impl From<Player> for GameObject {
    fn from(p: Player) -> Self {
        let mut obj = layout(
            ObjectKind::Player,
            [p.x, p.y, p.size, p.speed, p.density].map(Attr::num),
        );
        if p.bullet {
            obj.add_modifier("bullet");
        }
        obj
    }
}

// SOLID OBJECTS ###########################################################

/// Immovable circle
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Planet gravity; positive pulls movable objects in, negative pushes
    pub attractor: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Circle {
            x,
            y,
            radius,
            attractor: 0.0,
        }
    }
}

impl From<Circle> for GameObject {
    fn from(c: Circle) -> Self {
        let mut obj = layout(ObjectKind::Circle, [c.x, c.y, c.radius].map(Attr::num));
        push_attractor(&mut obj, c.attractor);
        obj
    }
}

/// Immovable rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, clockwise
    pub rotation: f64,
    /// Treat (x, y) as the top-left corner instead of the center
    pub from_corner: bool,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rectangle {
            x,
            y,
            width,
            height,
            rotation: 0.0,
            from_corner: false,
        }
    }
}

impl From<Rectangle> for GameObject {
    fn from(r: Rectangle) -> Self {
        let kind = ObjectKind::Rectangle;
        let (x, y) = stored_center(kind, r.x, r.y, r.width, r.height, r.from_corner);
        layout(kind, [x, y, r.width, r.height, r.rotation].map(Attr::num))
    }
}

/// Immovable triangle
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub points: [Point; 3],
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        Triangle { points: [a, b, c] }
    }
}

impl From<Triangle> for GameObject {
    fn from(t: Triangle) -> Self {
        layout(ObjectKind::Triangle, t.points.into_iter().flat_map(point))
    }
}

/// Solid line segment
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub thickness: f64,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Line {
            start,
            end,
            thickness: 3.0,
        }
    }
}

impl From<Line> for GameObject {
    fn from(l: Line) -> Self {
        let attrs = point(l.start)
            .into_iter()
            .chain(point(l.end))
            .chain([Attr::num(l.thickness)]);
        layout(ObjectKind::Line, attrs)
    }
}

/// Circular arc around a center point
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub x: f64,
    pub y: f64,
    /// Degrees
    pub start_angle: f64,
    /// Degrees
    pub end_angle: f64,
    pub radius: f64,
    /// Control point of a three-point arc; `None` keeps a center arc
    pub control: Option<Point>,
    pub thickness: f64,
}

impl Arc {
    pub fn new(x: f64, y: f64, start_angle: f64, end_angle: f64, radius: f64) -> Self {
        Arc {
            x,
            y,
            start_angle,
            end_angle,
            radius,
            control: None,
            thickness: 3.0,
        }
    }
}

impl From<Arc> for GameObject {
    fn from(a: Arc) -> Self {
        let (cx, cy) = a.control.unwrap_or((-1.0, -1.0));
        // The literal 2 before the thickness has no known meaning
        let attrs = [a.x, a.y, a.start_angle, a.end_angle, a.radius, cx, cy]
            .map(Attr::num)
            .into_iter()
            .chain([Attr::Int(2), Attr::num(a.thickness)]);
        layout(ObjectKind::Arc, attrs)
    }
}

/// Cubic Bézier curve drawn as `resolution` straight pieces
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
    pub thickness: f64,
    pub resolution: u32,
}

impl Curve {
    pub fn new(start: Point, control1: Point, control2: Point, end: Point) -> Self {
        Curve {
            start,
            control1,
            control2,
            end,
            thickness: 3.0,
            resolution: 100,
        }
    }
}

impl From<Curve> for GameObject {
    fn from(c: Curve) -> Self {
        let attrs = [c.start, c.control1, c.control2, c.end]
            .into_iter()
            .flat_map(point)
            .chain([Attr::num(c.thickness), Attr::Int(c.resolution as i64)]);
        layout(ObjectKind::Curve, attrs)
    }
}

// GROWING OBJECTS #########################################################

/// Solid circle that grows whenever a collectable is collected
#[derive(Debug, Clone, PartialEq)]
pub struct GrowingCircle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Keep the absolute position instead of moving with the level size
    pub keep_position: bool,
    pub attractor: f64,
}

impl GrowingCircle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        GrowingCircle {
            x,
            y,
            radius,
            keep_position: false,
            attractor: 0.0,
        }
    }
}

impl From<GrowingCircle> for GameObject {
    fn from(c: GrowingCircle) -> Self {
        let mut obj = layout(ObjectKind::GrowingCircle, [c.x, c.y, c.radius].map(Attr::num));
        if c.keep_position {
            obj.add_modifier("samePosition");
        }
        push_attractor(&mut obj, c.attractor);
        obj
    }
}

/// Solid rectangle that grows whenever a collectable is collected
#[derive(Debug, Clone, PartialEq)]
pub struct GrowingRectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub keep_position: bool,
    pub from_corner: bool,
}

impl GrowingRectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        GrowingRectangle {
            x,
            y,
            width,
            height,
            rotation: 0.0,
            keep_position: false,
            from_corner: false,
        }
    }
}

impl From<GrowingRectangle> for GameObject {
    fn from(r: GrowingRectangle) -> Self {
        let kind = ObjectKind::GrowingRectangle;
        let (x, y) = stored_center(kind, r.x, r.y, r.width, r.height, r.from_corner);
        let mut obj = layout(kind, [x, y, r.width, r.height, r.rotation].map(Attr::num));
        if r.keep_position {
            obj.add_modifier("samePosition");
        }
        obj
    }
}

// MOVEABLE OBJECTS ########################################################

#[derive(Debug, Clone, PartialEq)]
pub struct MoveableCircle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// 0 makes the circle solid
    pub density: f64,
    pub damping: f64,
    /// Draw with the wheel sprite
    pub wheel_sprite: bool,
    pub attractor: f64,
}

impl MoveableCircle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        MoveableCircle {
            x,
            y,
            radius,
            density: 1.0,
            damping: 0.0,
            wheel_sprite: false,
            attractor: 0.0,
        }
    }
}

impl From<MoveableCircle> for GameObject {
    fn from(c: MoveableCircle) -> Self {
        let mut obj = layout(
            ObjectKind::MoveableCircle,
            [c.x, c.y, c.radius, c.density, c.damping].map(Attr::num),
        );
        if c.wheel_sprite {
            obj.add_modifier("wheelsprite");
        }
        push_attractor(&mut obj, c.attractor);
        obj
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveableRectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub density: f64,
    pub damping: f64,
    pub rotation: f64,
    pub fix_rotation: bool,
    pub from_corner: bool,
}

impl MoveableRectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        MoveableRectangle {
            x,
            y,
            width,
            height,
            density: 1.0,
            damping: -1.0,
            rotation: 0.0,
            fix_rotation: false,
            from_corner: false,
        }
    }
}

impl From<MoveableRectangle> for GameObject {
    fn from(r: MoveableRectangle) -> Self {
        let kind = ObjectKind::MoveableRectangle;
        let (x, y) = stored_center(kind, r.x, r.y, r.width, r.height, r.from_corner);
        // Damping is stored twice, before and after the rotation
        let attrs = [x, y, r.width, r.height, r.density, r.damping, r.rotation, r.damping];
        let mut obj = layout(kind, attrs.map(Attr::num));
        if r.fix_rotation {
            obj.add_modifier("fixrot");
        }
        obj
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveableTriangle {
    pub points: [Point; 3],
    pub density: f64,
    pub fix_rotation: bool,
}

impl MoveableTriangle {
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        MoveableTriangle {
            points: [a, b, c],
            density: 1.0,
            fix_rotation: false,
        }
    }
}

impl From<MoveableTriangle> for GameObject {
    fn from(t: MoveableTriangle) -> Self {
        let attrs = t
            .points
            .into_iter()
            .flat_map(point)
            .chain([Attr::num(t.density)]);
        let mut obj = layout(ObjectKind::MoveableTriangle, attrs);
        if t.fix_rotation {
            obj.add_modifier("fixrot");
        }
        obj
    }
}

// SPECIAL OBJECTS #########################################################

/// Rectangle on a fixed pivot; extents are the full displayed size
#[derive(Debug, Clone, PartialEq)]
pub struct RotatableRectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub density: f64,
    pub damping: f64,
    pub from_corner: bool,
}

impl RotatableRectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        RotatableRectangle {
            x,
            y,
            width,
            height,
            rotation: 0.0,
            density: 1.0,
            damping: 0.0,
            from_corner: false,
        }
    }
}

impl From<RotatableRectangle> for GameObject {
    fn from(r: RotatableRectangle) -> Self {
        let kind = ObjectKind::RotatableRectangle;
        let (x, y) = stored_center(kind, r.x, r.y, r.width, r.height, r.from_corner);
        let attrs = [x, y, r.width, r.height, r.rotation, r.density, r.damping];
        layout(kind, attrs.map(Attr::num))
    }
}

/// Circle on a fixed pivot, optionally motor driven
#[derive(Debug, Clone, PartialEq)]
pub struct RotatableCircle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub motor_speed: f64,
    pub torque: f64,
}

impl RotatableCircle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        RotatableCircle {
            x,
            y,
            radius,
            motor_speed: 0.0,
            torque: 100.0,
        }
    }
}

impl From<RotatableCircle> for GameObject {
    fn from(c: RotatableCircle) -> Self {
        layout(
            ObjectKind::RotatableCircle,
            [c.x, c.y, c.radius, c.motor_speed, c.torque].map(Attr::num),
        )
    }
}

/// Rectangle that springs back to a resting rotation of 0 degrees
#[derive(Debug, Clone, PartialEq)]
pub struct SpringyRectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Starting rotation; the resting rotation stays 0
    pub rotation: f64,
    pub density: f64,
    pub frequency: f64,
    pub damping: f64,
    /// Pivot position relative to the center
    pub fulcrum_offset: f64,
    /// Drawn size of the pivot only
    pub fulcrum_radius: f64,
    pub from_corner: bool,
}

impl SpringyRectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        SpringyRectangle {
            x,
            y,
            width,
            height,
            rotation: 0.0,
            density: 1.0,
            frequency: 2.0,
            damping: 0.3,
            fulcrum_offset: 0.0,
            fulcrum_radius: 10.0,
            from_corner: false,
        }
    }
}

impl From<SpringyRectangle> for GameObject {
    fn from(r: SpringyRectangle) -> Self {
        let kind = ObjectKind::SpringyRectangle;
        let (x, y) = stored_center(kind, r.x, r.y, r.width, r.height, r.from_corner);
        let attrs = [
            x,
            y,
            r.width,
            r.height,
            r.rotation,
            r.density,
            r.frequency,
            r.damping,
            r.fulcrum_offset,
            r.fulcrum_radius,
        ];
        layout(kind, attrs.map(Attr::num))
    }
}

/// Teleports a touching player to `target`
#[derive(Debug, Clone, PartialEq)]
pub struct Portal {
    pub position: Point,
    pub target: Point,
    /// Collected-circle count after which the portal switches off
    pub deactivate_after: f64,
    /// Touch time required before teleporting
    pub min_time: f64,
}

impl Portal {
    pub fn new(position: Point, target: Point) -> Self {
        Portal {
            position,
            target,
            deactivate_after: 7.0,
            min_time: 0.0,
        }
    }
}

impl From<Portal> for GameObject {
    fn from(p: Portal) -> Self {
        // The literal 1 after the target has no known meaning
        let attrs = point(p.position)
            .into_iter()
            .chain(point(p.target))
            .chain([Attr::Int(1), Attr::num(p.deactivate_after), Attr::num(p.min_time)]);
        layout(ObjectKind::Portal, attrs)
    }
}

fn push_attractor(obj: &mut GameObject, attractor: f64) {
    if attractor != 0.0 {
        obj.add_modifier(format!("attr {}", Attr::num(attractor)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_of(obj: impl Into<GameObject>) -> String {
        obj.into().attribute_line()
    }

    #[test]
    fn test_player_layout() {
        let obj: GameObject = Player::new(1500.0, 1500.0).into();
        assert_eq!(obj.attribute_line(), "y 1500 1500 1 1 1");
        assert_eq!(obj.modifiers(), &["bullet".to_string()]);
        assert_eq!(obj.position_count(), Some(1));

        let quiet: GameObject = Player {
            bullet: false,
            ..Player::new(0.0, 0.0)
        }
        .into();
        assert!(quiet.modifiers().is_empty());
    }

    #[test]
    fn test_circle_attractor_modifier() {
        let obj: GameObject = Circle {
            attractor: -2.5,
            ..Circle::new(1500.0, 1275.0, 25.0)
        }
        .into();
        assert_eq!(obj.attribute_line(), "c 1500 1275 25");
        assert_eq!(obj.modifiers(), &["attr -2.5".to_string()]);
    }

    #[test]
    fn test_rectangle_center_and_corner() {
        assert_eq!(line_of(Rectangle::new(1500.0, 1575.0, 100.0, 25.0)), "b 1500 1575 100 25 0");

        let corner = Rectangle {
            from_corner: true,
            ..Rectangle::new(1400.0, 1550.0, 100.0, 25.0)
        };
        assert_eq!(line_of(corner), "b 1500 1575 100 25 0");
    }

    #[test]
    fn test_rotatable_rectangle_corner_uses_half_extent() {
        let corner = RotatableRectangle {
            from_corner: true,
            ..RotatableRectangle::new(0.0, 0.0, 50.0, 20.0)
        };
        assert_eq!(line_of(corner), "rr 25 10 50 20 0 1 0");
    }

    #[test]
    fn test_multi_point_shapes() {
        let tri = Triangle::new((0.0, 0.0), (10.0, 0.0), (5.0, 8.5));
        assert_eq!(line_of(tri), "t 0 0 10 0 5 8.5");

        let line = Line::new((1.0, 2.0), (3.0, 4.0));
        assert_eq!(line_of(line), "l_at 1 2 3 4 3");

        let curve = Curve::new((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0));
        let obj: GameObject = curve.into();
        assert_eq!(obj.attribute_line(), "curve 0 0 1 1 2 2 3 3 3 100");
        assert_eq!(obj.positions().unwrap().len(), 4);
    }

    #[test]
    fn test_arc_layout() {
        let obj: GameObject = Arc::new(1500.0, 1500.0, 0.0, 90.0, 200.0).into();
        assert_eq!(obj.attribute_line(), "/ LE_ARC_DESCRIPTION 1500 1500 0 90 200 -1 -1 2 3");
        assert_eq!(obj.tag(), "/ LE_ARC_DESCRIPTION");
        assert_eq!(obj.positions().unwrap(), vec![(1500.0, 1500.0)]);
    }

    #[test]
    fn test_growing_modifiers() {
        let obj: GameObject = GrowingCircle {
            keep_position: true,
            attractor: 1.0,
            ..GrowingCircle::new(1.0, 2.0, 3.0)
        }
        .into();
        assert_eq!(obj.attribute_line(), "gc 1 2 3");
        assert_eq!(obj.modifiers(), &["samePosition".to_string(), "attr 1".to_string()]);

        let rect: GameObject = GrowingRectangle {
            keep_position: true,
            ..GrowingRectangle::new(1.0, 2.0, 3.0, 4.0)
        }
        .into();
        assert_eq!(rect.attribute_line(), "rGr 1 2 3 4 0");
        assert_eq!(rect.modifiers(), &["samePosition".to_string()]);
    }

    #[test]
    fn test_moveable_layouts() {
        let circle: GameObject = MoveableCircle {
            wheel_sprite: true,
            ..MoveableCircle::new(10.0, 20.0, 5.0)
        }
        .into();
        assert_eq!(circle.attribute_line(), "mc 10 20 5 1 0");
        assert_eq!(circle.modifiers(), &["wheelsprite".to_string()]);

        let rect: GameObject = MoveableRectangle {
            fix_rotation: true,
            ..MoveableRectangle::new(10.0, 20.0, 15.0, 15.0)
        }
        .into();
        assert_eq!(rect.attribute_line(), "mb 10 20 15 15 1 -1 0 -1");
        assert_eq!(rect.modifiers(), &["fixrot".to_string()]);

        let tri = MoveableTriangle::new((0.0, 0.0), (1.0, 0.0), (0.0, 1.0));
        assert_eq!(line_of(tri), "mt 0 0 1 0 0 1 1");
    }

    #[test]
    fn test_special_layouts() {
        assert_eq!(line_of(RotatableCircle::new(5.0, 5.0, 2.0)), "rc 5 5 2 0 100");
        assert_eq!(
            line_of(SpringyRectangle::new(5.0, 5.0, 5.0, 50.0)),
            "wr 5 5 5 50 0 1 2 0.3 0 10"
        );
        assert_eq!(
            line_of(Portal::new((100.0, 100.0), (122.0, 100.0))),
            "portal 100 100 122 100 1 7 0"
        );
    }
}
