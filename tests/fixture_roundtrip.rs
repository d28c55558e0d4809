//! Round-trip tests over the level files in `tests/fixtures/`
//!
//! One test is generated per `.txt` file. Add a file to cover a new layout.

use circloo_level::{GameObject, Level};
use dir_test::{dir_test, Fixture};
use similar_asserts::assert_eq;

/// Connection endpoints as current ids
fn topology(level: &Level, obj: &GameObject) -> Option<[Option<usize>; 2]> {
    obj.connections()
        .map(|[a, b]| [level.index_of(a), level.index_of(b)])
}

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/tests/fixtures",
    glob: "**/*.txt",
)]
fn test_fixture_round_trip(fixture: Fixture<&str>) {
    let level = Level::parse(fixture.content())
        .unwrap_or_else(|e| panic!("{} failed to parse: {}", fixture.path(), e));
    let text = level.serialize().unwrap();
    let reparsed = Level::parse(&text).unwrap();

    // Writing is stable after one normalization
    assert_eq!(reparsed.serialize().unwrap(), text);

    assert_eq!(reparsed.config(), level.config());
    assert_eq!(reparsed.len(), level.len());
    for (original, copy) in level.iter().zip(reparsed.iter()) {
        assert_eq!(copy.tag(), original.tag());
        assert_eq!(copy.attributes(), original.attributes());
        assert_eq!(copy.modifiers(), original.modifiers());
        assert_eq!(copy.position_count(), original.position_count());
        assert_eq!(topology(&reparsed, copy), topology(&level, original));
    }

    for (index, obj) in reparsed.iter().enumerate() {
        assert_eq!(obj.id(), Some(index));
        assert!(text.contains(&format!("\n< {}", index)));
    }
}

#[test]
fn test_unordered_footers_are_renumbered() {
    let text = include_str!("fixtures/unordered_footers.txt");
    let level = Level::parse(text).unwrap();

    // The stray music group is dropped; everything else is numbered in file order
    assert_eq!(level.len(), 5);
    let tags: Vec<String> = level.iter().map(GameObject::tag).collect();
    assert_eq!(tags.join(" ").as_str(), "c tmb tmt r portal");
    assert_eq!(level.config().color.value(), 44);

    let rope = level.object_at(3).unwrap();
    assert_eq!(topology(&level, rope), Some([Some(0), Some(1)]));
}

#[test]
fn test_mechanisms_header() {
    let level = Level::parse(include_str!("fixtures/mechanisms.txt")).unwrap();
    let config = level.config();
    assert!(config.recommend_sfx);
    assert_eq!(config.music.0, 1);
    assert_eq!(config.music.1, 3);
    assert_eq!(level.len(), 10);
    assert_eq!(level.object_at(7).unwrap().tag().as_str(), "/ GLUE");
    assert_eq!(level.object_at(9).unwrap().attribute_line().as_str(), "spc Teleport");
}

#[test]
fn test_unknown_header_comments_stay_out_of_objects() {
    let level = Level::parse(include_str!("fixtures/extra_header_comment.txt")).unwrap();
    assert_eq!(level.config().color.value(), 7);
    assert_eq!(level.len(), 2);
    let first = level.object_at(0).unwrap();
    assert_eq!(first.attribute_line().as_str(), "c 1500 1400 40");
    assert!(first.modifiers().is_empty());
    assert_eq!(
        level.object_at(1).unwrap().attribute_line().as_str(),
        "b 1500 1575 100.50 25 0"
    );
}
