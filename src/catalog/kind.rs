//! Schema table of known entity kinds
//!
//! Maps each kind to its tag, the number of coordinate pairs stored after the
//! tag, and the anchor convention of its first pair.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::core::{Attr, GameObject, Point};

/// Where a kind's stored position sits relative to the corner it is placed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    /// The stored pair is the placement point
    Stored,
    /// Rectangles storing center plus half extents at `[3]` and `[4]`
    HalfExtent,
    /// Rotatable rectangles storing center plus full extents at `[3]` and `[4]`
    FullExtent,
}

impl Anchor {
    /// Displacement from the top-left corner to the stored center
    pub fn corner_to_center(&self, width: f64, height: f64) -> Point {
        match self {
            Anchor::Stored => (0.0, 0.0),
            Anchor::HalfExtent => (width, height),
            Anchor::FullExtent => (width / 2.0, height / 2.0),
        }
    }

    /// Same displacement, reading the extents from an object's attributes
    pub fn offset_of(&self, obj: &GameObject) -> Point {
        if *self == Anchor::Stored {
            return (0.0, 0.0);
        }
        let extent = |index| obj.attribute(index).and_then(Attr::as_f64).unwrap_or(0.0);
        self.corner_to_center(extent(3), extent(4))
    }
}

/// Collectable variants; each has a plain and a collect-from-object code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectableKind {
    Basic,
    Gravity,
    Size,
    Disconnect,
    Speed,
    Special,
}

impl CollectableKind {
    pub const ALL: [CollectableKind; 6] = [
        CollectableKind::Basic,
        CollectableKind::Gravity,
        CollectableKind::Size,
        CollectableKind::Disconnect,
        CollectableKind::Speed,
        CollectableKind::Special,
    ];

    pub fn code(&self, from_object: bool) -> &'static str {
        match (self, from_object) {
            (CollectableKind::Basic, false) => "i",
            (CollectableKind::Basic, true) => "io",
            (CollectableKind::Gravity, false) => "ig",
            (CollectableKind::Gravity, true) => "im",
            (CollectableKind::Size, false) => "is",
            (CollectableKind::Size, true) => "iso",
            (CollectableKind::Disconnect, false) => "irb",
            (CollectableKind::Disconnect, true) => "irbo",
            (CollectableKind::Speed, false) => "ips",
            (CollectableKind::Speed, true) => "ipso",
            (CollectableKind::Special, false) => "isp",
            (CollectableKind::Special, true) => "ispo",
        }
    }

    fn from_code(code: &str) -> Option<(CollectableKind, bool)> {
        CollectableKind::ALL.iter().find_map(|kind| {
            [false, true]
                .into_iter()
                .find(|&from_object| kind.code(from_object) == code)
                .map(|from_object| (*kind, from_object))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
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
    BallGenerator,
    RectangleGenerator,
    TriangleGenerator,
    Portal,
    Glue,
    Rope,
    FixedDistanceConnection,
    Pulley,
    Hinge,
    Slider,
    SpecialConnection,
    Collectable {
        kind: CollectableKind,
        from_object: bool,
    },
}

impl ObjectKind {
    /// Every kind with a fixed tag (collectables are matched separately)
    const FIXED: [ObjectKind; 26] = [
        ObjectKind::Player,
        ObjectKind::Circle,
        ObjectKind::Rectangle,
        ObjectKind::Triangle,
        ObjectKind::Line,
        ObjectKind::Arc,
        ObjectKind::Curve,
        ObjectKind::GrowingCircle,
        ObjectKind::GrowingRectangle,
        ObjectKind::MoveableCircle,
        ObjectKind::MoveableRectangle,
        ObjectKind::MoveableTriangle,
        ObjectKind::RotatableRectangle,
        ObjectKind::RotatableCircle,
        ObjectKind::SpringyRectangle,
        ObjectKind::BallGenerator,
        ObjectKind::RectangleGenerator,
        ObjectKind::TriangleGenerator,
        ObjectKind::Portal,
        ObjectKind::Glue,
        ObjectKind::Rope,
        ObjectKind::FixedDistanceConnection,
        ObjectKind::Pulley,
        ObjectKind::Hinge,
        ObjectKind::Slider,
        ObjectKind::SpecialConnection,
    ];

    pub fn tag(&self) -> Cow<'static, str> {
        let tag = match self {
            ObjectKind::Player => "y",
            ObjectKind::Circle => "c",
            ObjectKind::Rectangle => "b",
            ObjectKind::Triangle => "t",
            ObjectKind::Line => "l_at",
            ObjectKind::Arc => "/ LE_ARC_DESCRIPTION",
            ObjectKind::Curve => "curve",
            ObjectKind::GrowingCircle => "gc",
            ObjectKind::GrowingRectangle => "rGr",
            ObjectKind::MoveableCircle => "mc",
            ObjectKind::MoveableRectangle => "mb",
            ObjectKind::MoveableTriangle => "mt",
            ObjectKind::RotatableRectangle => "rr",
            ObjectKind::RotatableCircle => "rc",
            ObjectKind::SpringyRectangle => "wr",
            ObjectKind::BallGenerator => "tmc",
            ObjectKind::RectangleGenerator => "tmb",
            ObjectKind::TriangleGenerator => "tmt",
            ObjectKind::Portal => "portal",
            ObjectKind::Glue => "/ GLUE",
            ObjectKind::Rope => "r",
            ObjectKind::FixedDistanceConnection => "fd",
            ObjectKind::Pulley => "/ p_description",
            ObjectKind::Hinge => "hinge",
            ObjectKind::Slider => "pr",
            ObjectKind::SpecialConnection => "spc",
            ObjectKind::Collectable { kind, from_object } => {
                return Cow::Owned(format!("ic '{}'", kind.code(*from_object)));
            }
        };
        Cow::Borrowed(tag)
    }

    /// Look up the kind an object tag belongs to
    pub fn from_tag(tag: &str) -> Option<ObjectKind> {
        if let Some(code) = tag
            .strip_prefix("ic '")
            .and_then(|rest| rest.strip_suffix('\''))
        {
            return CollectableKind::from_code(code)
                .map(|(kind, from_object)| ObjectKind::Collectable { kind, from_object });
        }
        ObjectKind::FIXED.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Number of coordinate pairs stored right after the tag
    pub fn position_count(&self) -> usize {
        match self {
            ObjectKind::Player
            | ObjectKind::Circle
            | ObjectKind::Rectangle
            | ObjectKind::Arc
            | ObjectKind::GrowingCircle
            | ObjectKind::GrowingRectangle
            | ObjectKind::MoveableCircle
            | ObjectKind::MoveableRectangle
            | ObjectKind::RotatableRectangle
            | ObjectKind::RotatableCircle
            | ObjectKind::SpringyRectangle
            | ObjectKind::BallGenerator
            | ObjectKind::RectangleGenerator
            | ObjectKind::Collectable { .. } => 1,
            ObjectKind::Line | ObjectKind::Portal => 2,
            ObjectKind::Triangle | ObjectKind::MoveableTriangle | ObjectKind::TriangleGenerator => 3,
            ObjectKind::Curve => 4,
            ObjectKind::Glue
            | ObjectKind::Rope
            | ObjectKind::FixedDistanceConnection
            | ObjectKind::Pulley
            | ObjectKind::Hinge
            | ObjectKind::Slider
            | ObjectKind::SpecialConnection => 0,
        }
    }

    pub fn anchor(&self) -> Anchor {
        match self {
            ObjectKind::Rectangle
            | ObjectKind::GrowingRectangle
            | ObjectKind::MoveableRectangle
            | ObjectKind::SpringyRectangle
            | ObjectKind::RectangleGenerator => Anchor::HalfExtent,
            ObjectKind::RotatableRectangle => Anchor::FullExtent,
            _ => Anchor::Stored,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            ObjectKind::Glue
                | ObjectKind::Rope
                | ObjectKind::FixedDistanceConnection
                | ObjectKind::Pulley
                | ObjectKind::Hinge
                | ObjectKind::Slider
                | ObjectKind::SpecialConnection
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_fixed_tag_round_trips() {
        for kind in ObjectKind::FIXED {
            assert_eq!(ObjectKind::from_tag(&kind.tag()), Some(kind));
        }
    }

    #[test]
    fn test_collectable_tags() {
        let kind = ObjectKind::Collectable {
            kind: CollectableKind::Gravity,
            from_object: true,
        };
        assert_eq!(kind.tag(), "ic 'im'");
        assert_eq!(ObjectKind::from_tag("ic 'im'"), Some(kind));
        assert_eq!(ObjectKind::from_tag("ic 'zz'"), None);
        assert_eq!(ObjectKind::from_tag("ic"), None);
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(ObjectKind::from_tag("totally_new_thing"), None);
    }

    #[test]
    fn test_connections_store_no_positions() {
        for kind in ObjectKind::FIXED {
            if kind.is_connection() {
                assert_eq!(kind.position_count(), 0, "{:?}", kind);
            } else {
                assert!(kind.position_count() > 0, "{:?}", kind);
            }
        }
    }

    #[test]
    fn test_anchor_offsets() {
        assert_eq!(Anchor::Stored.corner_to_center(10.0, 4.0), (0.0, 0.0));
        assert_eq!(Anchor::HalfExtent.corner_to_center(10.0, 4.0), (10.0, 4.0));
        assert_eq!(Anchor::FullExtent.corner_to_center(10.0, 4.0), (5.0, 2.0));
    }
}
