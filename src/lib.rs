//! circloO level builder
//!
//! Build, edit, parse and write levels for the circloO physics game in its
//! plain-text level format. Objects come from the typed factories in
//! [`catalog`], can be moved together as an [`ObjectGroup`], and are placed
//! in a [`Level`] whose positional ids stay contiguous through every edit.

pub mod catalog;
pub mod core;
pub mod error;
pub mod group;
pub mod level;
pub mod logger;

pub use crate::core::{Attr, GameObject, Lexeme, Number, ObjectHandle, ObjectKey, Point, ResolveId};
pub use error::{LevelError, Result};
pub use group::{Member, ObjectGroup};
pub use level::{Color, Level, LevelConfig, Music};
pub use logger::{LevelLogger, OutputMode, VerbosityLevel};
