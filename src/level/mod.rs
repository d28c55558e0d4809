//! A circloO level: header settings plus an ordered list of objects
//!
//! An object's id is its index in the list. Every structural edit keeps
//! `objects[i].id() == Some(i)` for all `i` by shifting the ids behind the
//! edit point before returning.

pub mod config;
pub mod format;

pub use config::{Color, LevelConfig, Music};
pub use format::{parse_level, parse_level_logged};

use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use std::str::FromStr;

use crate::core::{GameObject, ObjectHandle, ObjectKey, ResolveId};
use crate::group::Member;
use crate::{LevelError, Result};

#[derive(Debug, Clone, Default)]
pub struct Level {
    config: LevelConfig,
    objects: Vec<GameObject>,
    /// Key of every object to its current id
    index: FxHashMap<ObjectKey, usize>,
}

impl Level {
    pub fn new(config: LevelConfig) -> Self {
        Level {
            config,
            objects: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut LevelConfig {
        &mut self.config
    }

    // OBJECTS #############################################################

    /// Append an object, every member of a group, or every object of a list
    ///
    /// An object that is not placed anywhere yet is moved in as is. An
    /// object that already carries an id, or whose key this level already
    /// tracks, is appended as a [`GameObject::copy`] instead.
    ///
    /// Returns the handle of the first object appended.
    pub fn add(&mut self, member: impl Into<Member>) -> Result<ObjectHandle> {
        let mut objects = Vec::new();
        flatten(member.into(), &mut objects);

        let handles: Vec<ObjectHandle> = objects.into_iter().map(|obj| self.push(obj)).collect();
        handles.first().copied().ok_or_else(|| {
            LevelError::UnsupportedMemberType("empty member list".to_string())
        })
    }

    /// Append several members in order, returning a handle per object
    pub fn add_all<I, M>(&mut self, members: I) -> Vec<ObjectHandle>
    where
        I: IntoIterator<Item = M>,
        M: Into<Member>,
    {
        let mut objects = Vec::new();
        for member in members {
            flatten(member.into(), &mut objects);
        }
        objects.into_iter().map(|obj| self.push(obj)).collect()
    }

    fn push(&mut self, obj: GameObject) -> ObjectHandle {
        let obj = self.adopt(obj);
        self.place(obj)
    }

    /// Append without the adopt-or-copy check
    fn place(&mut self, mut obj: GameObject) -> ObjectHandle {
        let id = self.objects.len();
        obj.set_id(id);
        let handle = ObjectHandle { key: obj.key(), id };
        self.index.insert(handle.key, id);
        self.objects.push(obj);
        handle
    }

    /// Take ownership of an incoming object, copying it when it is already
    /// placed somewhere
    fn adopt(&self, obj: GameObject) -> GameObject {
        if obj.id().is_none() && !self.contains(obj.key()) {
            obj
        } else {
            obj.copy()
        }
    }

    /// Place an object at `index`, shifting everything from `index` on up by one
    pub fn insert(&mut self, index: usize, obj: impl Into<GameObject>) -> Result<ObjectHandle> {
        if index > self.objects.len() {
            return Err(LevelError::IndexOutOfRange {
                index,
                len: self.objects.len(),
            });
        }

        let mut obj = self.adopt(obj.into());
        obj.set_id(index);
        let handle = ObjectHandle {
            key: obj.key(),
            id: index,
        };
        self.objects.insert(index, obj);
        self.index.insert(handle.key, index);
        for following in &mut self.objects[index + 1..] {
            following.shift_id(1);
            if let Some(id) = self.index.get_mut(&following.key()) {
                *id += 1;
            }
        }
        Ok(handle)
    }

    /// Put an object in place of the one at `index` and return the displaced one
    ///
    /// The new object takes over the displaced object's identity, so
    /// connections that pointed at the slot now point at the replacement.
    /// The displaced object gets a fresh key and keeps its old id.
    pub fn replace(&mut self, index: usize, obj: impl Into<GameObject>) -> Result<GameObject> {
        let len = self.objects.len();
        if index >= len {
            return Err(LevelError::IndexOutOfRange { index, len });
        }

        let mut incoming = self.adopt(obj.into());
        let slot_key = self.objects[index].key();
        incoming.set_key(slot_key);
        incoming.set_id(index);

        let mut displaced = std::mem::replace(&mut self.objects[index], incoming);
        displaced.rekey();
        Ok(displaced)
    }

    /// Take out the object at `index`, shifting everything after it down by one
    ///
    /// The returned object still carries its old id. Connections in the
    /// level that pointed at it no longer resolve.
    pub fn remove(&mut self, index: usize) -> Result<GameObject> {
        let len = self.objects.len();
        if index >= len {
            return Err(LevelError::IndexOutOfRange { index, len });
        }

        let removed = self.objects.remove(index);
        self.index.remove(&removed.key());
        for following in &mut self.objects[index..] {
            following.shift_id(-1);
            if let Some(id) = self.index.get_mut(&following.key()) {
                *id -= 1;
            }
        }
        Ok(removed)
    }

    /// Remove every object whose tag matches `tag` (see [`GameObject::has_tag`])
    ///
    /// `"ic"` removes every collectable, whatever its code. Returns the
    /// removed objects in their original order, each with its pre-removal id.
    /// Connections to removed objects are left in place; see
    /// [`Level::remove_broken_connections`].
    pub fn remove_all(&mut self, tag: &str) -> Vec<GameObject> {
        self.extract(|obj| obj.has_tag(tag))
    }

    /// Remove every connection with an endpoint that is not in the level
    ///
    /// Repeats until no such connection is left, so a connection whose
    /// endpoint was itself a broken connection goes too.
    pub fn remove_broken_connections(&mut self) -> Vec<GameObject> {
        let mut removed = Vec::new();
        loop {
            let broken: FxHashSet<ObjectKey> = self
                .objects
                .iter()
                .filter(|obj| {
                    obj.connections()
                        .map_or(false, |ends| ends.iter().any(|key| !self.contains(*key)))
                })
                .map(GameObject::key)
                .collect();
            if broken.is_empty() {
                return removed;
            }
            removed.extend(self.extract(|obj| broken.contains(&obj.key())));
        }
    }

    /// Take out every object matching `pred` in one pass, then renumber
    fn extract(&mut self, pred: impl Fn(&GameObject) -> bool) -> Vec<GameObject> {
        let (removed, kept): (Vec<GameObject>, Vec<GameObject>) =
            std::mem::take(&mut self.objects).into_iter().partition(|obj| pred(obj));
        self.objects = kept;
        self.renumber();
        removed
    }

    fn renumber(&mut self) {
        self.index.clear();
        for (id, obj) in self.objects.iter_mut().enumerate() {
            obj.set_id(id);
            self.index.insert(obj.key(), id);
        }
    }

    // ACCESS ##############################################################

    pub fn object_at(&self, id: usize) -> Option<&GameObject> {
        self.objects.get(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameObject> {
        self.objects.iter()
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    /// Current id of the object with `key`
    pub fn index_of(&self, key: ObjectKey) -> Option<usize> {
        self.index.get(&key).copied()
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.index.contains_key(&key)
    }

    /// Fresh handle for the object currently at `index`
    pub fn handle_at(&self, index: usize) -> Option<ObjectHandle> {
        self.objects.get(index).map(|obj| ObjectHandle {
            key: obj.key(),
            id: index,
        })
    }

    // TEXT FORM ###########################################################

    pub fn header(&self) -> String {
        format::write_header(&self.config)
    }

    /// Full level text: header, then every object with its `< id` footer
    pub fn serialize(&self) -> Result<String> {
        let mut parts = Vec::with_capacity(self.objects.len() + 1);
        parts.push(self.header());
        for obj in &self.objects {
            parts.push(obj.serialize(&self.index, true)?);
        }
        Ok(parts.join("\n"))
    }

    /// Parse level text (see [`format::parse_level`])
    pub fn parse(text: &str) -> Result<Level> {
        format::parse_level(text)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Level> {
        let contents = std::fs::read_to_string(path)?;
        Level::parse(&contents)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.serialize()?)?;
        Ok(())
    }

    /// Both levels' objects in one level, with `first`'s header
    ///
    /// Objects are copied. Connections between objects of the same source
    /// level are redirected to the copies.
    pub fn combine(first: &Level, second: &Level) -> Level {
        let mut combined = Level::new(first.config.clone());
        for source in [first, second] {
            let copies: Vec<GameObject> = source.objects.iter().map(GameObject::copy).collect();
            let renamed: FxHashMap<ObjectKey, ObjectKey> = source
                .objects
                .iter()
                .zip(&copies)
                .map(|(original, copy)| (original.key(), copy.key()))
                .collect();

            for mut copy in copies {
                copy.remap_connections(|key| renamed.get(&key).copied().unwrap_or(key));
                combined.place(copy);
            }
        }
        combined
    }
}

/// Flatten groups and lists into objects in order
fn flatten(member: Member, out: &mut Vec<GameObject>) {
    match member {
        Member::Object(obj) => out.push(obj),
        Member::Group(group) => out.extend(group.into_members()),
        Member::List(list) => {
            for member in list {
                flatten(member, out);
            }
        }
    }
}

impl ResolveId for Level {
    fn resolve_id(&self, key: ObjectKey) -> Option<usize> {
        self.index_of(key)
    }
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self> {
        Level::parse(s)
    }
}

impl<'a> IntoIterator for &'a Level {
    type Item = &'a GameObject;
    type IntoIter = std::slice::Iter<'a, GameObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}
