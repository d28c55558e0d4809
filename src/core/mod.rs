//! Core value types: attributes, identities and game objects

pub mod attr;
pub mod entity;
pub mod object;

pub use attr::{Attr, Lexeme, Number};
pub use entity::{NoObjects, ObjectHandle, ObjectKey, ResolveId};
pub use object::{GameObject, Point, MAX_POSITIONS};
