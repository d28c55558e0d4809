//! Collectable circles
//!
//! Every collectable variant stores `ic '<code>' x y appear_at_segment`
//! followed by the variant's own values. The code depends on the variant and
//! on whether the collectable is picked up by the player or by another object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{layout, CollectableKind, ObjectKind};
use crate::core::{Attr, GameObject};

/// Variant of a collectable and its extra values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Only grows the player circle
    Basic,
    /// Changes gravity; direction in degrees (270 is down)
    Gravity { direction: f64, strength: f64 },
    /// Sets the player size
    Size(f64),
    /// Disconnects the player from all connections
    Disconnect,
    /// Sets the player speed
    Speed(f64),
    /// Acts on objects linked by a special connection
    Special,
}

impl Effect {
    pub fn kind(&self) -> CollectableKind {
        match self {
            Effect::Basic => CollectableKind::Basic,
            Effect::Gravity { .. } => CollectableKind::Gravity,
            Effect::Size(_) => CollectableKind::Size,
            Effect::Disconnect => CollectableKind::Disconnect,
            Effect::Speed(_) => CollectableKind::Speed,
            Effect::Special => CollectableKind::Special,
        }
    }

    fn extras(&self) -> Vec<Attr> {
        match *self {
            Effect::Gravity {
                direction,
                strength,
            } => vec![Attr::num(direction), Attr::num(strength)],
            Effect::Size(value) | Effect::Speed(value) => vec![Attr::num(value)],
            Effect::Basic | Effect::Disconnect | Effect::Special => Vec::new(),
        }
    }
}

/// Sound bank a collect sound is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundGroup {
    Default,
    Drum,
    Piano,
    /// Miscellaneous effects
    House,
    Silent,
}

impl SoundGroup {
    pub fn prefix(&self) -> &'static str {
        match self {
            SoundGroup::Default => "",
            SoundGroup::Drum => "drum",
            SoundGroup::Piano => "piano",
            SoundGroup::House => "house",
            SoundGroup::Silent => "none",
        }
    }
}

/// Whether a trigger plays its sound when it does nothing else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayMode {
    Auto,
    Yes,
    #[default]
    No,
}

impl PlayMode {
    pub fn code(&self) -> i64 {
        match self {
            PlayMode::Auto => -1,
            PlayMode::Yes => 1,
            PlayMode::No => 0,
        }
    }
}

/// Sound played on collection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Sound {
    Note {
        group: SoundGroup,
        /// Index into the group's sound list, not a pitch
        note: u32,
        volume: f64,
        pitch: f64,
        play: PlayMode,
    },
    Mute,
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sound::Note {
                group,
                note,
                volume,
                pitch,
                play,
            } => write!(
                f,
                "sfx '{}{}' {} {} {}",
                group.prefix(),
                note,
                Attr::num(*volume),
                Attr::num(*pitch),
                play.code()
            ),
            Sound::Mute => write!(f, "sfx 'none'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collectable {
    pub effect: Effect,
    pub x: f64,
    pub y: f64,
    /// Segment in which the collectable first appears
    pub appear_at_segment: f64,
    /// Collected count within the segment after which it appears
    pub part_of_segment: f64,
    /// Camera zoom on collection; -1 keeps it, -2 shows the whole level
    pub zoom: f64,
    /// Collecting does not grow the player circle
    pub is_trigger: bool,
    /// Only collected by a non-player object
    pub from_object: bool,
    pub sounds: Vec<Sound>,
}

impl Collectable {
    pub fn new(x: f64, y: f64) -> Self {
        Collectable::with_effect(Effect::Basic, x, y)
    }

    pub fn with_effect(effect: Effect, x: f64, y: f64) -> Self {
        Collectable {
            effect,
            x,
            y,
            appear_at_segment: 1.0,
            part_of_segment: 0.0,
            zoom: -1.0,
            is_trigger: false,
            from_object: false,
            sounds: Vec::new(),
        }
    }

    pub fn gravity(x: f64, y: f64) -> Self {
        let effect = Effect::Gravity {
            direction: 270.0,
            strength: 1.0,
        };
        Collectable::with_effect(effect, x, y)
    }

    pub fn size(x: f64, y: f64) -> Self {
        Collectable::with_effect(Effect::Size(1.0), x, y)
    }

    pub fn disconnect(x: f64, y: f64) -> Self {
        Collectable::with_effect(Effect::Disconnect, x, y)
    }

    pub fn speed(x: f64, y: f64) -> Self {
        Collectable::with_effect(Effect::Speed(1.0), x, y)
    }

    pub fn special(x: f64, y: f64) -> Self {
        Collectable::with_effect(Effect::Special, x, y)
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Collectable {
            kind: self.effect.kind(),
            from_object: self.from_object,
        }
    }

    /// Add a collect sound with unit volume and pitch
    pub fn set_sound(&mut self, group: SoundGroup, note: u32) -> &mut Self {
        self.set_sound_with(group, note, 1.0, 1.0, PlayMode::default())
    }

    pub fn set_sound_with(
        &mut self,
        group: SoundGroup,
        note: u32,
        volume: f64,
        pitch: f64,
        play: PlayMode,
    ) -> &mut Self {
        self.sounds.push(Sound::Note {
            group,
            note,
            volume,
            pitch,
            play,
        });
        self
    }

    pub fn mute(&mut self) -> &mut Self {
        self.sounds.push(Sound::Mute);
        self
    }
}

impl From<Collectable> for GameObject {
    fn from(c: Collectable) -> Self {
        let attrs = [c.x, c.y, c.appear_at_segment]
            .map(Attr::num)
            .into_iter()
            .chain(c.effect.extras());
        let mut obj = layout(c.kind(), attrs);

        if c.part_of_segment != 0.0 {
            obj.add_modifier(format!("iGrow {}", Attr::num(c.part_of_segment)));
        }
        if c.zoom != -1.0 {
            obj.add_modifier(format!("zoomFactor {}", Attr::num(c.zoom)));
        }
        if c.is_trigger {
            obj.add_modifier("trigger");
        }
        for sound in &c.sounds {
            obj.add_modifier(sound.to_string());
        }
        obj
    }
}
