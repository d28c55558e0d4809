//! Catalog of circloO entity kinds
//!
//! Each factory is a plain struct with public fields. `new` takes the
//! required values and fills in the game editor's defaults, so optional
//! settings use struct update syntax:
//!
//! ```ignore
//! let gen = BallGenerator {
//!     timing: Timing::new(1.0, 3.0, 0.0),
//!     ..BallGenerator::new(1350.0, 1300.0, 25.0)
//! };
//! let obj: GameObject = gen.into();
//! ```

pub mod collectables;
pub mod connections;
pub mod generators;
pub mod kind;
pub mod shapes;

pub use collectables::{Collectable, Effect, PlayMode, Sound, SoundGroup};
pub use connections::{
    FixedDistanceConnection, Glue, Hinge, Pulley, Rope, Slider, SpecialAction, SpecialConnection,
};
pub use generators::{BallGenerator, RectangleGenerator, Timing, TriangleGenerator};
pub use kind::{Anchor, CollectableKind, ObjectKind};
pub use shapes::{
    Arc, Circle, Curve, GrowingCircle, GrowingRectangle, Line, MoveableCircle, MoveableRectangle,
    MoveableTriangle, Player, Portal, Rectangle, RotatableCircle, RotatableRectangle,
    SpringyRectangle, Triangle,
};

use crate::core::{Attr, GameObject, Point};

/// Frames per second of the game; timed settings are stored in frames
pub const FPS: f64 = 60.0;

/// Start an object of `kind` with its tag and the attributes after it
fn layout(kind: ObjectKind, attributes: impl IntoIterator<Item = Attr>) -> GameObject {
    GameObject::new(std::iter::once(Attr::text(kind.tag())).chain(attributes))
        .with_position_count(kind.position_count())
}

fn frames(seconds: f64) -> Attr {
    Attr::num(seconds * FPS)
}

fn flag(value: bool) -> Attr {
    Attr::Int(value as i64)
}

fn point(p: Point) -> [Attr; 2] {
    [Attr::num(p.0), Attr::num(p.1)]
}

/// Stored center of a rectangle-family object
///
/// Corner placement converts (x, y) from the top-left corner to the
/// center the game stores.
fn stored_center(kind: ObjectKind, x: f64, y: f64, width: f64, height: f64, from_corner: bool) -> Point {
    if !from_corner {
        return (x, y);
    }
    let (dx, dy) = kind.anchor().corner_to_center(width, height);
    (x + dx, y + dy)
}

/// `From<factory>` for [`crate::group::Member`], so factories can be handed
/// straight to `Level::add` and `ObjectGroup::add`
macro_rules! into_member {
    ($($factory:ty),* $(,)?) => {
        $(
            impl From<$factory> for crate::group::Member {
                fn from(factory: $factory) -> Self {
                    crate::group::Member::Object(GameObject::from(factory))
                }
            }
        )*
    };
}

into_member!(
    Player,
    Circle,
    Rectangle,
    Triangle,
    Line,
    Arc,
    Curve,
    GrowingCircle,
    GrowingRectangle,
    MoveableCircle,
    MoveableRectangle,
    MoveableTriangle,
    RotatableRectangle,
    RotatableCircle,
    SpringyRectangle,
    Portal,
    BallGenerator,
    RectangleGenerator,
    TriangleGenerator,
    Glue,
    Rope,
    FixedDistanceConnection,
    Pulley,
    Hinge,
    Slider,
    SpecialConnection,
    Collectable,
);
