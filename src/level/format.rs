//! circloO level text format
//!
//! A level file is a header followed by one line group per object. Every
//! object group ends with a `< id` footer line:
//!
//! ```text
//! /
//! / circloO level
//! totalCircles 2 1
//! COLORS 185
//! grav 1 270
//! y 1500 1500 1 1 1
//! bullet
//! < 0
//! > 0
//! > 2
//! r 0 0 0 0 0
//! < 1
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1},
    character::complete::{char, i64 as signed, space0, space1, u32 as unsigned, u64 as long},
    combinator::{all_consuming, map, map_res, value},
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};

use crate::catalog::ObjectKind;
use crate::core::{GameObject, Number};
use crate::level::config::{Color, LevelConfig, Music};
use crate::level::Level;
use crate::logger::{LevelLogger, VerbosityLevel};
use crate::{LevelError, Result};

/// Line prefixes that carry header fields
const HEADER_KEYWORDS: [&str; 7] = [
    "totalCircles",
    "levelscriptVersion",
    "COLORS",
    "grav",
    "music",
    "recommend_sfx",
    "/ _SAVE_TIME_",
];


/// One recognized header line
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderField {
    TotalCircles { segments: Number, start_full: bool },
    ScriptVersion(u32),
    Color(Color),
    Gravity { scale: Number, direction: Number },
    Music(Music),
    RecommendSfx,
    SaveTime(u64),
}

impl HeaderField {
    fn apply(self, config: &mut LevelConfig) {
        match self {
            HeaderField::TotalCircles {
                segments,
                start_full,
            } => {
                config.segments = segments;
                config.start_full = start_full;
            }
            HeaderField::ScriptVersion(version) => config.script_version = version,
            HeaderField::Color(color) => config.color = color,
            HeaderField::Gravity { scale, direction } => {
                config.gravity_scale = scale;
                config.gravity_direction = direction;
            }
            HeaderField::Music(music) => config.music = music,
            HeaderField::RecommendSfx => config.recommend_sfx = true,
            HeaderField::SaveTime(time) => config.save_time = time,
        }
    }
}

// PARSERS #################################################################

fn number(input: &str) -> IResult<&str, Number> {
    map_res(take_till1(|c: char| c.is_whitespace()), str::parse::<Number>)(input)
}

fn header_field(input: &str) -> IResult<&str, HeaderField> {
    alt((
        map(
            preceded(
                tag("totalCircles"),
                tuple((preceded(space1, number), preceded(space1, signed))),
            ),
            |(segments, full)| HeaderField::TotalCircles {
                segments,
                start_full: full != 0,
            },
        ),
        map(
            preceded(tag("levelscriptVersion"), preceded(space1, unsigned)),
            HeaderField::ScriptVersion,
        ),
        map(preceded(tag("COLORS"), preceded(space1, signed)), |c| {
            HeaderField::Color(Color::new(c))
        }),
        map(
            preceded(
                tag("grav"),
                tuple((preceded(space1, number), preceded(space1, number))),
            ),
            |(scale, direction)| HeaderField::Gravity { scale, direction },
        ),
        map(
            preceded(
                tag("music"),
                tuple((preceded(space1, signed), preceded(space1, signed))),
            ),
            |(mode, track)| HeaderField::Music(Music(mode, track)),
        ),
        value(HeaderField::RecommendSfx, tag("recommend_sfx")),
        map(
            delimited(tag("/ _SAVE_TIME_"), long, tag("_END")),
            HeaderField::SaveTime,
        ),
    ))(input)
}

fn reference(input: &str) -> IResult<&str, u64> {
    preceded(terminated(char('>'), space0), long)(input)
}

/// Parse a header line
///
/// Returns `Ok(None)` for lines that are not header fields, and an error for
/// a header keyword line whose values do not parse.
pub fn header_line(line: &str) -> Result<Option<HeaderField>> {
    let line = line.trim();
    if !HEADER_KEYWORDS.iter().any(|keyword| line.starts_with(keyword)) {
        return Ok(None);
    }
    all_consuming(terminated(header_field, space0))(line)
        .map(|(_, field)| Some(field))
        .map_err(|_| LevelError::ParseError(format!("Malformed header line: '{}'", line)))
}

/// Target id of a `> id` connection line
pub fn reference_id(line: &str) -> Result<usize> {
    all_consuming(terminated(reference, space0))(line.trim())
        .map(|(_, id)| id as usize)
        .map_err(|_| LevelError::ParseError(format!("Malformed connection line: '{}'", line)))
}

/// A `/` comment line in the header
///
/// The editor writes several (`/ circloO level`, `/ EDITOR_VIEW ...`) and
/// newer versions add more. `/` lines whose first two tokens form a catalog
/// tag (`/ GLUE`, `/ LE_ARC_DESCRIPTION`) are objects, not comments.
fn is_header_comment(line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("/") {
        return false;
    }
    match tokens.next() {
        None => true,
        Some(word) => ObjectKind::from_tag(&format!("/ {}", word)).is_none(),
    }
}

/// Split object lines into groups, each ending with its `<` footer
///
/// Blank lines are dropped. Trailing lines without a footer form a final
/// group of their own.
pub fn split_line_groups<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();

    for &line in lines {
        if line.trim().is_empty() {
            continue;
        }
        current.push(line);
        if line.starts_with('<') {
            groups.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

// WRITING #################################################################

/// Header block, without a trailing newline
pub fn write_header(config: &LevelConfig) -> String {
    let mut lines = vec![
        "/".to_string(),
        "/ circloO level".to_string(),
        "/ Made with circloO Level Editor".to_string(),
        format!("totalCircles {} {}", config.segments, config.start_full as u8),
        "/ EDITOR_TOOL 1 select".to_string(),
        "/ EDITOR_VIEW 1500 1500 1".to_string(),
        "/ EDT 3303".to_string(),
        format!("/ _SAVE_TIME_{}_END", config.save_time),
        format!("levelscriptVersion {}", config.script_version),
        format!("COLORS {}", config.color),
        format!("grav {} {}", config.gravity_scale, config.gravity_direction),
    ];
    if config.recommend_sfx {
        lines.push("recommend_sfx".to_string());
    }
    if !config.music.is_none() {
        lines.push(format!("music {} {}", config.music.0, config.music.1));
    }
    lines.join("\n")
}

// LEVEL PARSING ###########################################################

/// Parse a whole level
pub fn parse_level(text: &str) -> Result<Level> {
    parse_level_logged(text, &LevelLogger::silent())
}

/// Parse a whole level, reporting header fields, objects and discarded
/// fragments to `logger`
///
/// Connections may only refer to objects that appear earlier in the text.
/// Objects are numbered by their order in the text; footer values are
/// ignored.
pub fn parse_level_logged(text: &str, logger: &LevelLogger) -> Result<Level> {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();

    // The header ends at the last header line before the first footer
    let mut config = LevelConfig::default();
    let mut header_end = 0;
    for (index, line) in lines.iter().enumerate() {
        if line.starts_with('<') {
            break;
        }
        if let Some(field) = header_line(line)? {
            logger.categorized(VerbosityLevel::Verbose, "header", line.trim());
            field.apply(&mut config);
            header_end = index + 1;
        } else if is_header_comment(line) {
            header_end = index + 1;
        }
    }

    let mut level = Level::new(config);
    for group in split_line_groups(&lines[header_end..]) {
        match GameObject::parse(&group, &level)? {
            Some(obj) => {
                if logger.enabled(VerbosityLevel::Verbose) {
                    let message = format!("object {}: {}", level.len(), obj.tag());
                    logger.categorized(VerbosityLevel::Verbose, "object", &message);
                }
                level.add(obj)?;
            }
            None => {
                let message = format!("discarded header fragment '{}'", group[0]);
                logger.categorized(VerbosityLevel::Normal, "fragment", &message);
            }
        }
    }
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LevelLogger;

    const SMALL: &str = "/
/ circloO level
/ Made with circloO Level Editor
totalCircles 3 1
/ EDITOR_TOOL 1 select
/ EDITOR_VIEW 1500 1500 1
/ EDT 3303
/ _SAVE_TIME_1700000000000_END
levelscriptVersion 8
COLORS 44
grav 0.5 90
recommend_sfx
music 2 4
c 1500 1275 25
< 0
tmc 1350 1300 25 1 60 180 0
< 1
> 0
> 1
r 0 0 0 0 0
< 2
";

    #[test]
    fn test_header_fields() {
        assert_eq!(
            header_line("totalCircles 2 1").unwrap(),
            Some(HeaderField::TotalCircles {
                segments: Number::Int(2),
                start_full: true
            })
        );
        assert_eq!(
            header_line("grav 1.5 270").unwrap(),
            Some(HeaderField::Gravity {
                scale: Number::Float(1.5),
                direction: Number::Int(270)
            })
        );
        assert_eq!(
            header_line("COLORS 185").unwrap(),
            Some(HeaderField::Color(Color::new(185)))
        );
        assert_eq!(
            header_line("/ _SAVE_TIME_1721799879000_END").unwrap(),
            Some(HeaderField::SaveTime(1_721_799_879_000))
        );
        assert_eq!(header_line("recommend_sfx").unwrap(), Some(HeaderField::RecommendSfx));
        assert_eq!(header_line("b 1 2 3 4 0").unwrap(), None);
        assert_eq!(header_line("/ circloO level").unwrap(), None);
    }

    #[test]
    fn test_malformed_header_line() {
        assert!(matches!(
            header_line("COLORS blue"),
            Err(LevelError::ParseError(_))
        ));
        assert!(header_line("grav 1").is_err());
    }

    #[test]
    fn test_reference_id() {
        assert_eq!(reference_id("> 12").unwrap(), 12);
        assert_eq!(reference_id(">3").unwrap(), 3);
        assert_eq!(reference_id("> 7  ").unwrap(), 7);
        assert!(reference_id("> x").is_err());
        assert!(reference_id("> -1").is_err());
        assert!(reference_id("< 1").is_err());
    }

    #[test]
    fn test_split_line_groups() {
        let lines = ["a", "< 0", "", "> 0", "> 0", "r", "< 1", "tail"];
        let groups = split_line_groups(&lines);
        assert_eq!(
            groups,
            vec![vec!["a", "< 0"], vec!["> 0", "> 0", "r", "< 1"], vec!["tail"]]
        );
    }

    #[test]
    fn test_write_header_optional_lines() {
        let plain = write_header(&LevelConfig::default());
        assert!(plain.ends_with("grav 1 270"));
        assert!(plain.contains("\ntotalCircles 7 0\n"));

        let config = LevelConfig {
            recommend_sfx: true,
            music: Music::forced(4),
            ..LevelConfig::default()
        };
        assert!(write_header(&config).ends_with("grav 1 270\nrecommend_sfx\nmusic 2 4"));
    }

    #[test]
    fn test_parse_small_level() {
        let level = parse_level(SMALL).unwrap();
        let config = level.config();
        assert_eq!(config.segments, Number::Int(3));
        assert!(config.start_full);
        assert_eq!(config.color.value(), 44);
        assert_eq!(config.gravity_scale, Number::Float(0.5));
        assert_eq!(config.gravity_direction, Number::Int(90));
        assert!(config.recommend_sfx);
        assert_eq!(config.music, Music(2, 4));
        assert_eq!(config.save_time, 1_700_000_000_000);

        assert_eq!(level.len(), 3);
        let rope = level.object_at(2).unwrap();
        assert_eq!(
            rope.connections(),
            Some([level.object_at(0).unwrap().key(), level.object_at(1).unwrap().key()])
        );
        assert_eq!(rope.position_count(), Some(0));
    }

    #[test]
    fn test_footer_values_are_renumbered() {
        let text = "grav 1 270\nc 0 0 1\n< 5\nc 1 1 1\n< 9";
        let level = parse_level(text).unwrap();
        assert_eq!(level.object_at(0).unwrap().id(), Some(0));
        assert_eq!(level.object_at(1).unwrap().id(), Some(1));
        assert!(level.serialize().unwrap().ends_with("c 0 0 1\n< 0\nc 1 1 1\n< 1"));
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let text = "grav 1 270\nc 0 0 1\n< 0\n> 0\n> 2\nr 0 0 0 0 0\n< 1\nc 5 5 1\n< 2";
        assert!(matches!(
            parse_level(text),
            Err(LevelError::UnresolvedReference(2))
        ));
    }

    #[test]
    fn test_unterminated_trailing_object() {
        let text = "grav 1 270\nc 0 0 1\n< 0\nb 1 2 3 4 0\nfixrot\n";
        let level = parse_level(text).unwrap();
        assert_eq!(level.len(), 2);
        assert_eq!(level.object_at(1).unwrap().modifiers(), &["fixrot".to_string()]);
    }

    #[test]
    fn test_unknown_header_comment_is_skipped() {
        let text = "grav 1 270\n/ SOME_NEW_HEADER 5\nc 0 0 1\n< 0";
        let level = parse_level(text).unwrap();
        assert_eq!(level.len(), 1);
        let obj = level.object_at(0).unwrap();
        assert_eq!(obj.attribute_line(), "c 0 0 1");
        assert!(obj.modifiers().is_empty());
    }

    #[test]
    fn test_slash_tagged_first_object_is_kept() {
        let text = "grav 1 270\n/ LE_ARC_DESCRIPTION 0 0 0 90 10 -1 -1 2 3\n< 0";
        let level = parse_level(text).unwrap();
        assert_eq!(level.len(), 1);
        assert_eq!(level.object_at(0).unwrap().tag(), "/ LE_ARC_DESCRIPTION");
    }

    #[test]
    fn test_header_comments() {
        assert!(is_header_comment("/"));
        assert!(is_header_comment("/ circloO level"));
        assert!(is_header_comment("/ EDITOR_VIEW 1500 1500 1"));
        assert!(is_header_comment("/ SOME_NEW_HEADER 5"));
        assert!(!is_header_comment("/ GLUE"));
        assert!(!is_header_comment("/ p_description 0 0 0 0 1 -100 1 -100 1"));
        assert!(!is_header_comment("c 0 0 1"));
    }

    #[test]
    fn test_header_only_level_is_empty() {
        let text = write_header(&LevelConfig::default());
        let level = parse_level(&text).unwrap();
        assert!(level.is_empty());
        assert_eq!(level.config(), &LevelConfig::default());
    }

    #[test]
    fn test_logged_parse_reports_fields_and_objects() {
        let logger = LevelLogger::capturing(VerbosityLevel::Verbose);
        parse_level_logged(SMALL, &logger).unwrap();

        let logs = logger.logs();
        let headers = logs
            .iter()
            .filter(|entry| entry.category.as_deref() == Some("header"))
            .count();
        let objects: Vec<&str> = logs
            .iter()
            .filter(|entry| entry.category.as_deref() == Some("object"))
            .map(|entry| entry.message.as_str())
            .collect();
        assert_eq!(headers, 7);
        assert_eq!(objects, vec!["object 0: c", "object 1: tmc", "object 2: r"]);
    }

    #[test]
    fn test_stray_music_group_is_discarded() {
        let logger = LevelLogger::capturing(VerbosityLevel::Normal);
        // A header fragment that only shows up after the first footer
        let text = "grav 1 270\nc 0 0 1\n< 0\nmusic 1 2\n< 1\nc 2 2 1\n< 2";
        let level = parse_level_logged(text, &logger).unwrap();

        assert_eq!(level.len(), 2);
        assert_eq!(level.config().music, Music::NONE);
        assert_eq!(logger.logs().len(), 1);
        assert_eq!(logger.logs()[0].message, "discarded header fragment 'music 1 2'");
    }
}
