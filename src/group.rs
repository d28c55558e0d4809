//! Rigid groups of objects that move together
//!
//! A group remembers where each member sits relative to its first member
//! (the primary) and re-derives every member's coordinates from a new
//! primary position. Offsets are measured from a rectangle's visual corner
//! rather than its stored center, so the corner conventions of the
//! rectangle families survive a move.

use smallvec::SmallVec;

use crate::core::{GameObject, Point, ResolveId, MAX_POSITIONS};
use crate::{LevelError, Result};

/// Anything a group or level accepts: one object, a whole group, or a list
#[derive(Debug, Clone)]
pub enum Member {
    Object(GameObject),
    Group(ObjectGroup),
    List(Vec<Member>),
}

impl Member {
    /// Flatten into objects in order, refusing nested groups
    fn into_objects(self, out: &mut Vec<GameObject>) -> Result<()> {
        match self {
            Member::Object(obj) => out.push(obj),
            Member::Group(_) => {
                return Err(LevelError::UnsupportedMemberType(
                    "an ObjectGroup cannot be a member of another ObjectGroup".to_string(),
                ))
            }
            Member::List(list) => {
                for member in list {
                    member.into_objects(out)?;
                }
            }
        }
        Ok(())
    }
}

impl From<GameObject> for Member {
    fn from(obj: GameObject) -> Self {
        Member::Object(obj)
    }
}

impl From<ObjectGroup> for Member {
    fn from(group: ObjectGroup) -> Self {
        Member::Group(group)
    }
}

impl From<Vec<GameObject>> for Member {
    fn from(objects: Vec<GameObject>) -> Self {
        Member::List(objects.into_iter().map(Member::Object).collect())
    }
}

impl From<Vec<Member>> for Member {
    fn from(members: Vec<Member>) -> Self {
        Member::List(members)
    }
}

type Offsets = SmallVec<[Point; MAX_POSITIONS]>;

#[derive(Debug, Clone)]
pub struct ObjectGroup {
    members: Vec<GameObject>,
    primary_position: Point,
    /// Per member, per coordinate pair; frozen when the member is added
    offsets: Vec<Offsets>,
}

impl ObjectGroup {
    /// Build a group; the first object becomes the primary
    pub fn new(members: Vec<GameObject>) -> Result<Self> {
        let primary = members.first().ok_or(LevelError::EmptyGroup)?;
        let primary_position = primary
            .positions()?
            .first()
            .copied()
            .ok_or_else(|| LevelError::InvalidAttribute {
                index: 1,
                reason: format!("group primary '{}' has no coordinate pair", primary.tag()),
            })?;

        let mut group = ObjectGroup {
            members: Vec::with_capacity(members.len()),
            primary_position,
            offsets: Vec::with_capacity(members.len()),
        };
        group.extend(members)?;
        Ok(group)
    }

    /// Append one object or a list of objects
    ///
    /// Either every new member is added or, on error, none is.
    pub fn add(&mut self, member: impl Into<Member>) -> Result<()> {
        let mut objects = Vec::new();
        member.into().into_objects(&mut objects)?;
        self.extend(objects)
    }

    fn extend(&mut self, objects: Vec<GameObject>) -> Result<()> {
        let offsets = objects
            .iter()
            .map(|obj| self.offsets_of(obj))
            .collect::<Result<Vec<_>>>()?;
        self.members.extend(objects);
        self.offsets.extend(offsets);
        Ok(())
    }

    fn offsets_of(&self, obj: &GameObject) -> Result<Offsets> {
        // Members without a position count (unknown tags, connections) never move
        if obj.position_count().unwrap_or(0) == 0 {
            return Ok(Offsets::new());
        }
        let (ax, ay) = anchor_offset(obj);
        let (px, py) = self.primary_position;
        Ok(obj
            .positions()?
            .into_iter()
            .enumerate()
            .map(|(pair, (x, y))| {
                if pair == 0 {
                    (x - px - ax, y - py - ay)
                } else {
                    (x - px, y - py)
                }
            })
            .collect())
    }

    /// Move the primary to `position` and every other member along with it
    ///
    /// All of the primary's coordinate pairs are set to `position`.
    pub fn set_position(&mut self, position: Point) -> Result<()> {
        let (px, py) = position;
        let mut members = self.members.iter_mut().zip(&self.offsets);

        if let Some((primary, _)) = members.next() {
            let count = primary.position_count().unwrap_or(0);
            if count > 0 {
                primary.set_positions(&vec![Some(position); count])?;
            }
        }

        for (member, offsets) in members {
            if offsets.is_empty() {
                continue;
            }
            let (ax, ay) = anchor_offset(member);
            let targets: SmallVec<[Option<Point>; MAX_POSITIONS]> = offsets
                .iter()
                .enumerate()
                .map(|(pair, &(dx, dy))| {
                    if pair == 0 {
                        Some((px + dx + ax, py + dy + ay))
                    } else {
                        Some((px + dx, py + dy))
                    }
                })
                .collect();
            member.set_positions(&targets)?;
        }

        self.primary_position = position;
        Ok(())
    }

    /// Independent group made of member copies, offsets recomputed
    pub fn copy(&self) -> Result<ObjectGroup> {
        ObjectGroup::new(self.members.iter().map(GameObject::copy).collect())
    }

    /// Copy the group and move the copy to `position`
    pub fn duplicate(&self, position: Point) -> Result<ObjectGroup> {
        let mut copy = self.copy()?;
        copy.set_position(position)?;
        Ok(copy)
    }

    pub fn primary(&self) -> &GameObject {
        &self.members[0]
    }

    pub fn primary_position(&self) -> Point {
        self.primary_position
    }

    pub fn members(&self) -> &[GameObject] {
        &self.members
    }

    pub fn into_members(self) -> Vec<GameObject> {
        self.members
    }

    /// Frozen offsets of the member at `index`
    pub fn offsets(&self, index: usize) -> Option<&[Point]> {
        self.offsets.get(index).map(|o| o.as_slice())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; a group holds at least its primary
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members with `< id` footers, one per line group
    pub fn serialize<R: ResolveId + ?Sized>(&self, ids: &R) -> Result<String> {
        let parts = self
            .members
            .iter()
            .map(|obj| obj.serialize(ids, true))
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join("\n"))
    }
}

fn anchor_offset(obj: &GameObject) -> Point {
    obj.kind()
        .map_or((0.0, 0.0), |kind| kind.anchor().offset_of(obj))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Circle, Line, Rectangle, Rope, RotatableRectangle, Triangle};
    use crate::core::NoObjects;

    fn first_position(obj: &GameObject) -> Point {
        obj.positions().unwrap()[0]
    }

    fn sample() -> ObjectGroup {
        ObjectGroup::new(vec![
            Circle::new(100.0, 100.0, 10.0).into(),
            Circle::new(130.0, 90.0, 5.0).into(),
            Line::new((100.0, 120.0), (140.0, 120.0)).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_group_rejected() {
        assert!(matches!(ObjectGroup::new(vec![]), Err(LevelError::EmptyGroup)));
    }

    #[test]
    fn test_offsets_frozen_at_add() {
        let group = sample();
        assert_eq!(group.primary_position(), (100.0, 100.0));
        assert_eq!(group.offsets(0).unwrap(), &[(0.0, 0.0)]);
        assert_eq!(group.offsets(1).unwrap(), &[(30.0, -10.0)]);
        assert_eq!(group.offsets(2).unwrap(), &[(0.0, 20.0), (40.0, 20.0)]);
    }

    #[test]
    fn test_set_position_moves_every_member() {
        let mut group = sample();
        group.set_position((500.0, 400.0)).unwrap();

        let members = group.members();
        assert_eq!(first_position(&members[0]), (500.0, 400.0));
        assert_eq!(first_position(&members[1]), (530.0, 390.0));
        assert_eq!(
            members[2].positions().unwrap(),
            vec![(500.0, 420.0), (540.0, 420.0)]
        );
    }

    #[test]
    fn test_set_position_is_idempotent() {
        let mut group = sample();
        group.set_position((7.0, 9.0)).unwrap();
        let once: Vec<String> = group.members().iter().map(GameObject::attribute_line).collect();
        group.set_position((7.0, 9.0)).unwrap();
        let twice: Vec<String> = group.members().iter().map(GameObject::attribute_line).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_offsets_preserved_across_moves() {
        let mut group = sample();
        group.set_position((-50.0, 3.0)).unwrap();
        group.set_position((1000.0, 2000.0)).unwrap();

        let primary = first_position(group.primary());
        for (index, member) in group.members().iter().enumerate().skip(1) {
            let frozen = group.offsets(index).unwrap();
            for (pair, (x, y)) in member.positions().unwrap().into_iter().enumerate() {
                assert_eq!((x - primary.0, y - primary.1), frozen[pair]);
            }
        }
    }

    #[test]
    fn test_rectangle_members_keep_stored_offset() {
        let mut group = ObjectGroup::new(vec![
            Circle::new(0.0, 0.0, 5.0).into(),
            Rectangle::new(40.0, 10.0, 20.0, 5.0).into(),
            RotatableRectangle::new(-30.0, 0.0, 10.0, 40.0).into(),
        ])
        .unwrap();

        // Offsets are measured from the visual corner
        assert_eq!(group.offsets(1).unwrap(), &[(20.0, 5.0)]);
        assert_eq!(group.offsets(2).unwrap(), &[(-35.0, -20.0)]);

        group.set_position((100.0, 100.0)).unwrap();
        assert_eq!(group.members()[1].attribute_line(), "b 140 110 20 5 0");
        assert_eq!(group.members()[2].attribute_line(), "rr 70 100 10 40 0 1 0");
    }

    #[test]
    fn test_primary_pairs_all_move_to_position() {
        let mut group = ObjectGroup::new(vec![
            Triangle::new((0.0, 0.0), (10.0, 0.0), (5.0, 5.0)).into(),
        ])
        .unwrap();
        group.set_position((3.0, 4.0)).unwrap();
        assert_eq!(
            group.primary().positions().unwrap(),
            vec![(3.0, 4.0), (3.0, 4.0), (3.0, 4.0)]
        );
    }

    #[test]
    fn test_connections_are_left_alone() {
        let a: GameObject = Circle::new(0.0, 0.0, 5.0).into();
        let b: GameObject = Circle::new(20.0, 0.0, 5.0).into();
        let rope: GameObject = Rope::new(&a, &b).into();
        let mut group = ObjectGroup::new(vec![a, b, rope]).unwrap();

        assert_eq!(group.offsets(2).unwrap(), &[] as &[Point]);
        group.set_position((50.0, 50.0)).unwrap();
        assert_eq!(group.members()[2].attribute_line(), "r 0 0 0 0 0");
        assert_eq!(first_position(&group.members()[1]), (70.0, 50.0));
    }

    #[test]
    fn test_add_list_and_reject_nested_group() {
        let mut group = sample();
        group
            .add(vec![
                GameObject::from(Circle::new(110.0, 100.0, 1.0)),
                GameObject::from(Circle::new(120.0, 100.0, 1.0)),
            ])
            .unwrap();
        assert_eq!(group.len(), 5);
        assert_eq!(group.offsets(4).unwrap(), &[(20.0, 0.0)]);

        let nested = sample();
        assert!(matches!(
            group.add(nested),
            Err(LevelError::UnsupportedMemberType(_))
        ));
        assert_eq!(group.len(), 5);
    }

    #[test]
    fn test_duplicate_is_independent() {
        let group = sample();
        let copy = group.duplicate((0.0, 0.0)).unwrap();

        assert_eq!(first_position(group.primary()), (100.0, 100.0));
        assert_eq!(first_position(copy.primary()), (0.0, 0.0));
        assert_eq!(first_position(&copy.members()[1]), (30.0, -10.0));
        for (original, copied) in group.members().iter().zip(copy.members()) {
            assert_ne!(original.key(), copied.key());
        }
    }

    #[test]
    fn test_serialize_unplaced_members() {
        let group = ObjectGroup::new(vec![Circle::new(1.0, 2.0, 3.0).into()]).unwrap();
        assert_eq!(group.serialize(&NoObjects).unwrap(), "c 1 2 3\n< -1");
    }
}
