//! Builds the sample level from catalog factories and checks the exact text

use circloo_level::catalog::{
    BallGenerator, Circle, Collectable, Player, Rectangle, Rope, SoundGroup, Timing,
};
use circloo_level::{Color, Level, LevelConfig, Number};
use similar_asserts::assert_eq;

const EXPECTED: &str = "/
/ circloO level
/ Made with circloO Level Editor
totalCircles 2 1
/ EDITOR_TOOL 1 select
/ EDITOR_VIEW 1500 1500 1
/ EDT 3303
/ _SAVE_TIME_1721799879000_END
levelscriptVersion 8
COLORS 185
grav 1 270
y 1500 1500 1 1 1
bullet
< 0
b 1500 1575 100 25 0
< 1
c 1500 1275 25
< 2
tmc 1350 1300 25 1 60 180 0
< 3
tmc 1650 1300 25 1 60 180 120
< 4
> 2
> 3
r 0 0 0 0 0
< 5
> 2
> 4
r 0 0 0 0 0
< 6
ic 'io' 1500 1400 1
trigger
sfx 'house0' 1 1 0
< 7";

fn build() -> Level {
    let mut level = Level::new(LevelConfig {
        segments: Number::Int(2),
        start_full: true,
        color: Color::new(185),
        ..LevelConfig::default()
    });

    let player = level.add(Player::new(1500.0, 1500.0)).unwrap();
    let floor = level.add(Rectangle::new(1500.0, 1575.0, 100.0, 25.0)).unwrap();
    let circle = level.add(Circle::new(1500.0, 1275.0, 25.0)).unwrap();
    assert_eq!((player.id, floor.id, circle.id), (0, 1, 2));

    let first = level
        .add(BallGenerator {
            timing: Timing::new(1.0, 3.0, 0.0),
            ..BallGenerator::new(1350.0, 1300.0, 25.0)
        })
        .unwrap();
    let second = level
        .add(BallGenerator {
            timing: Timing::new(1.0, 3.0, 2.0),
            ..BallGenerator::new(1650.0, 1300.0, 25.0)
        })
        .unwrap();

    level.add(Rope::new(circle, first)).unwrap();
    level.add(Rope::new(circle, second)).unwrap();

    let mut collectable = Collectable {
        from_object: true,
        is_trigger: true,
        ..Collectable::new(1500.0, 1400.0)
    };
    collectable.set_sound(SoundGroup::House, 0);
    level.add(collectable).unwrap();

    level
}

#[test]
fn test_basic_build_text() {
    assert_eq!(build().serialize().unwrap().as_str(), EXPECTED);
}

#[test]
fn test_basic_build_parses_back() {
    let level = Level::parse(EXPECTED).unwrap();
    assert_eq!(level.len(), 8);
    assert_eq!(level.config().color.value(), 185);
    assert!(level.config().start_full);
    assert_eq!(level.serialize().unwrap().as_str(), EXPECTED);
}

#[test]
fn test_basic_build_survives_an_insert() {
    let mut level = build();
    level.insert(0, Circle::new(0.0, 0.0, 5.0)).unwrap();

    let text = level.serialize().unwrap();
    // Both ropes still join the hanging circle to its generators
    assert!(text.contains("> 3\n> 4\nr 0 0 0 0 0\n< 6\n> 3\n> 5\nr 0 0 0 0 0\n< 7"));
    assert!(text.ends_with("sfx 'house0' 1 1 0\n< 8"));
}
