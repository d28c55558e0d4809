//! A single level object and its line-group form

use smallvec::SmallVec;

use crate::catalog::ObjectKind;
use crate::core::attr::Attr;
use crate::core::entity::{ObjectKey, ResolveId};
use crate::level::{format, Level};
use crate::{LevelError, Result};

/// An (x, y) coordinate pair
pub type Point = (f64, f64);

/// No object kind stores more than four coordinate pairs
pub const MAX_POSITIONS: usize = 4;

/// Head of every collectable tag (`ic 'i'`, `ic 'ig'`, ...)
const COLLECTABLE_HEAD: &str = "ic";

/// Tokens that only form a tag together with the token after them
const COMPOUND_TAG_HEADS: [&str; 2] = ["/", COLLECTABLE_HEAD];

/// One serializable game entity
///
/// `attributes[0]` is the tag. When a position count is known, coordinate
/// pairs occupy `attributes[1..=2 * count]`.
///
/// `Clone` keeps the object's identity, so a clone still satisfies
/// connections made to the original. [`GameObject::copy`] makes a distinct
/// object.
#[derive(Debug, Clone)]
pub struct GameObject {
    key: ObjectKey,
    attributes: SmallVec<[Attr; 12]>,
    modifiers: Vec<String>,
    connections: Option<[ObjectKey; 2]>,
    id: Option<usize>,
    position_count: Option<usize>,
}

impl GameObject {
    pub fn new<I, A>(attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attr>,
    {
        GameObject {
            key: ObjectKey::fresh(),
            attributes: attributes.into_iter().map(Into::into).collect(),
            modifiers: Vec::new(),
            connections: None,
            id: None,
            position_count: None,
        }
    }

    /// Builder form of [`GameObject::set_position_count`] for catalog layouts
    pub(crate) fn with_position_count(mut self, count: usize) -> Self {
        debug_assert!(count <= MAX_POSITIONS);
        self.position_count = Some(count.min(MAX_POSITIONS));
        self
    }

    pub fn key(&self) -> ObjectKey {
        self.key
    }

    pub(crate) fn rekey(&mut self) {
        self.key = ObjectKey::fresh();
    }

    pub(crate) fn set_key(&mut self, key: ObjectKey) {
        self.key = key;
    }

    // ID ##################################################################

    /// Position in the owning level; `None` until placed
    pub fn id(&self) -> Option<usize> {
        self.id
    }

    pub fn set_id(&mut self, id: usize) {
        self.id = Some(id);
    }

    /// Move the id by `delta`; unplaced objects are left alone
    pub fn shift_id(&mut self, delta: isize) {
        if let Some(id) = self.id {
            self.id = Some(id.saturating_add_signed(delta));
        }
    }

    // PROPERTIES ##########################################################

    pub fn attributes(&self) -> &[Attr] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> Option<&Attr> {
        self.attributes.get(index)
    }

    /// Replace all attributes; the position count is not re-checked
    pub fn set_attributes<I, A>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = A>,
        A: Into<Attr>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
    }

    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    pub fn add_modifier(&mut self, modifier: impl Into<String>) {
        self.modifiers.push(modifier.into());
    }

    pub fn connections(&self) -> Option<[ObjectKey; 2]> {
        self.connections
    }

    pub fn is_connection(&self) -> bool {
        self.connections.is_some()
    }

    /// Set the two endpoints of a connection
    pub fn set_connections(&mut self, endpoints: &[ObjectKey]) -> Result<()> {
        match endpoints {
            [a, b] => {
                self.connections = Some([*a, *b]);
                Ok(())
            }
            _ => Err(LevelError::InvalidConnection(endpoints.len())),
        }
    }

    /// Infallible form of [`GameObject::set_connections`]
    pub fn connect(&mut self, a: impl Into<ObjectKey>, b: impl Into<ObjectKey>) {
        self.connections = Some([a.into(), b.into()]);
    }

    pub(crate) fn remap_connections(&mut self, mut map: impl FnMut(ObjectKey) -> ObjectKey) {
        if let Some([a, b]) = self.connections {
            self.connections = Some([map(a), map(b)]);
        }
    }

    /// The entity kind marker
    ///
    /// Usually the first attribute. When the first attribute is the bare `/`
    /// marker, the tag is the first two attributes joined by a space.
    pub fn tag(&self) -> String {
        match self.attributes.first() {
            None => String::new(),
            Some(Attr::Text(head)) if head == "/" => match self.attributes.get(1) {
                Some(next) => format!("/ {}", next),
                None => head.clone(),
            },
            Some(first) => first.to_string(),
        }
    }

    /// True when `tag` is this object's tag, or is `ic` and this object is a
    /// collectable
    pub fn has_tag(&self, tag: &str) -> bool {
        let own = self.tag();
        own == tag
            || (tag == COLLECTABLE_HEAD
                && own
                    .split_once(' ')
                    .map_or(false, |(head, _)| head == COLLECTABLE_HEAD))
    }

    /// Catalog kind for this object's tag, if the tag is a known one
    pub fn kind(&self) -> Option<ObjectKind> {
        ObjectKind::from_tag(&self.tag())
    }

    // POSITIONS ###########################################################

    pub fn position_count(&self) -> Option<usize> {
        self.position_count
    }

    pub fn set_position_count(&mut self, count: usize) -> Result<()> {
        if count > MAX_POSITIONS {
            return Err(LevelError::TooManyPositions {
                supplied: count,
                allowed: MAX_POSITIONS,
            });
        }
        self.position_count = Some(count);
        Ok(())
    }

    /// Read the coordinate pairs declared by the position count
    pub fn positions(&self) -> Result<Vec<Point>> {
        let count = self
            .position_count
            .ok_or(LevelError::UninitializedPositionCount)?;

        (0..count)
            .map(|pair| {
                let x = self.coordinate(1 + 2 * pair)?;
                let y = self.coordinate(2 + 2 * pair)?;
                Ok((x, y))
            })
            .collect()
    }

    fn coordinate(&self, index: usize) -> Result<f64> {
        match self.attributes.get(index) {
            Some(attr) => attr.as_f64().ok_or_else(|| LevelError::InvalidAttribute {
                index,
                reason: format!("'{}' is not a number", attr),
            }),
            None => Err(LevelError::InvalidAttribute {
                index,
                reason: "missing coordinate".to_string(),
            }),
        }
    }

    /// Write coordinate pairs in order; a `None` entry leaves that pair as is
    pub fn set_positions(&mut self, positions: &[Option<Point>]) -> Result<()> {
        let allowed = self
            .position_count
            .ok_or(LevelError::UninitializedPositionCount)?;

        let supplied = positions
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| last + 1);
        if supplied > allowed {
            return Err(LevelError::TooManyPositions { supplied, allowed });
        }

        let needed = 1 + 2 * supplied;
        if self.attributes.len() < needed {
            return Err(LevelError::InvalidAttribute {
                index: self.attributes.len(),
                reason: format!("object has too few attributes for {} positions", supplied),
            });
        }

        for (pair, point) in positions.iter().enumerate() {
            if let Some((x, y)) = *point {
                self.attributes[1 + 2 * pair] = Attr::num(x);
                self.attributes[2 + 2 * pair] = Attr::num(y);
            }
        }
        Ok(())
    }

    /// Move the first coordinate pair
    pub fn set_position(&mut self, point: Point) -> Result<()> {
        self.set_positions(&[Some(point)])
    }

    // UTILITIES ###########################################################

    /// Structural copy with a new identity
    ///
    /// Attributes, modifiers, id and position count are duplicated;
    /// connections still point at the same endpoint objects.
    pub fn copy(&self) -> GameObject {
        let mut copy = self.clone();
        copy.rekey();
        copy
    }

    /// Write this object's line group
    ///
    /// Connection endpoints are turned into ids through `ids`. With
    /// `with_id_footer` a trailing `< id` line is appended (`-1` when the
    /// object has not been placed).
    pub fn serialize<R>(&self, ids: &R, with_id_footer: bool) -> Result<String>
    where
        R: ResolveId + ?Sized,
    {
        let mut lines = Vec::with_capacity(3 + self.modifiers.len());

        if let Some(endpoints) = self.connections {
            for endpoint in endpoints {
                let id = ids
                    .resolve_id(endpoint)
                    .ok_or_else(|| LevelError::BrokenConnection {
                        object: self.describe(),
                        endpoint: endpoint.to_string(),
                    })?;
                lines.push(format!("> {}", id));
            }
        }

        lines.push(self.attribute_line());
        lines.extend(self.modifiers.iter().cloned());

        if with_id_footer {
            match self.id {
                Some(id) => lines.push(format!("< {}", id)),
                None => lines.push("< -1".to_string()),
            }
        }

        Ok(lines.join("\n"))
    }

    pub fn attribute_line(&self) -> String {
        self.attributes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn describe(&self) -> String {
        match self.id {
            Some(id) => format!("'{}' at id {}", self.tag(), id),
            None => format!("'{}' (unplaced)", self.tag()),
        }
    }

    /// Rebuild an object from its line group
    ///
    /// Connection ids are looked up among the objects already in `level`.
    /// Returns `Ok(None)` for a stray header fragment (`music`,
    /// `recommend_sfx`). The value of the `< id` footer is discarded; the
    /// level assigns ids by insertion order.
    pub fn parse(lines: &[&str], level: &Level) -> Result<Option<GameObject>> {
        let first = lines
            .first()
            .ok_or_else(|| LevelError::ParseError("Empty object line group".to_string()))?;

        if first.starts_with("music") || first.starts_with("recommend_sfx") {
            return Ok(None);
        }

        let body = match lines.split_last() {
            Some((last, rest)) if last.starts_with('<') => rest,
            _ => lines,
        };

        let (connections, rest) = if first.starts_with('>') {
            let second = body.get(1).filter(|line| line.starts_with('>')).ok_or_else(|| {
                LevelError::ParseError(format!(
                    "Connection '{}' must be followed by a second '>' line",
                    first
                ))
            })?;
            let a = resolve_reference(first, level)?;
            let b = resolve_reference(second, level)?;
            (Some([a, b]), &body[2..])
        } else {
            (None, body)
        };

        let (attribute_line, modifier_lines) = rest.split_first().ok_or_else(|| {
            LevelError::ParseError("Object line group has no attribute line".to_string())
        })?;

        let attributes = tokenize_attributes(attribute_line);
        if attributes.is_empty() {
            return Err(LevelError::ParseError(
                "Object attribute line is empty".to_string(),
            ));
        }

        let mut obj = GameObject::new(attributes);
        obj.connections = connections;
        obj.position_count = obj.kind().map(|kind| kind.position_count());
        obj.modifiers = modifier_lines.iter().map(|line| line.to_string()).collect();

        Ok(Some(obj))
    }
}

impl From<&GameObject> for ObjectKey {
    fn from(obj: &GameObject) -> Self {
        obj.key()
    }
}

/// A slice resolves keys to slice positions
impl ResolveId for [GameObject] {
    fn resolve_id(&self, key: ObjectKey) -> Option<usize> {
        self.iter().position(|obj| obj.key == key)
    }
}

fn resolve_reference(line: &str, level: &Level) -> Result<ObjectKey> {
    let id = format::reference_id(line)?;
    level
        .object_at(id)
        .map(GameObject::key)
        .ok_or(LevelError::UnresolvedReference(id))
}

/// Split an attribute line into tokens, joining compound tags (`/ GLUE`,
/// `ic 'i'`) into a single leading attribute
fn tokenize_attributes(line: &str) -> SmallVec<[Attr; 12]> {
    let mut tokens = line.split_whitespace().peekable();
    let mut attributes = SmallVec::new();

    if let Some(head) = tokens.next() {
        let tag = match tokens.peek() {
            Some(next) if COMPOUND_TAG_HEADS.contains(&head) => {
                let joined = format!("{} {}", head, next);
                tokens.next();
                joined
            }
            _ => head.to_string(),
        };
        attributes.push(Attr::Text(tag));
    }

    attributes.extend(tokens.map(Attr::from_token));
    attributes
}
