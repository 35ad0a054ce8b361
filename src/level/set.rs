/// Level-set and level-definition file parsing.
///
/// ## Level-set file
///   Pairs of lines: a `key:Display Name` line followed by the path of
///   that set's level-definition file (relative paths resolve against the
///   set file's directory):
///   ```text
///   a:Arcade
///   levels/arcade.txt
///   m:Marathon
///   levels/marathon.txt
///   ```
///
/// ## Level-definition file
///   Levels separated by a line containing only `---`. Each level:
///   ```text
///   # Level Name
///   speed=24
///   paddle=8
///   <brick rows>
///   ```
///   Brick legend: `#` one-hit, `%` two-hit, `=` unbreakable, space empty.
///   A `#`-line counts as the name only when it contains a letter, which
///   distinguishes it from an all-brick row such as `##########`.

use std::io;
use std::path::Path;

use crate::level::info::{LevelInfo, DEFAULT_BALL_SPEED, DEFAULT_PADDLE_WIDTH};

/// One named, ordered sequence of levels, selectable from the Start menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSet {
    pub key: char,
    pub name: String,
    pub levels: Vec<LevelInfo>,
}

/// Read every level-set named by `path`, loading each set's levels.
pub fn read_level_sets(path: &Path) -> io::Result<Vec<LevelSet>> {
    let text = std::fs::read_to_string(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let mut sets = Vec::new();
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    while let Some(header) = lines.next() {
        let (key, name) = parse_set_header(header)?;
        let def_line = lines.next().ok_or_else(|| {
            invalid(format!("level set {name:?} is missing its definition path"))
        })?;
        let def_path = base.join(def_line.trim());
        let def_text = std::fs::read_to_string(&def_path).map_err(|e| {
            invalid(format!("cannot read level definitions {}: {e}", def_path.display()))
        })?;
        let levels = parse_level_defs(&def_text);
        if levels.is_empty() {
            return Err(invalid(format!("{} contains no levels", def_path.display())));
        }
        sets.push(LevelSet { key, name, levels });
    }

    if sets.is_empty() {
        return Err(invalid(format!("{} defines no level sets", path.display())));
    }
    Ok(sets)
}

fn parse_set_header(line: &str) -> io::Result<(char, String)> {
    let line = line.trim();
    let (key, name) = line
        .split_once(':')
        .ok_or_else(|| invalid(format!("malformed level-set line {line:?}, expected key:name")))?;
    let mut chars = key.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok((c, name.trim().to_string())),
        _ => Err(invalid(format!("level-set key {key:?} must be a single character"))),
    }
}

/// Parse every level from a definition file. Malformed sections (no brick
/// rows) are skipped.
pub fn parse_level_defs(content: &str) -> Vec<LevelInfo> {
    content
        .split("\n---")
        .map(|s| s.trim_start_matches(['-', '\n']))
        .filter_map(parse_level)
        .collect()
}

fn parse_level(section: &str) -> Option<LevelInfo> {
    let mut name = String::new();
    let mut ball_speed = DEFAULT_BALL_SPEED;
    let mut paddle_width = DEFAULT_PADDLE_WIDTH;
    let mut rows: Vec<String> = Vec::new();

    for line in section.lines() {
        if name.is_empty() && rows.is_empty() && is_name_line(line) {
            name = line[1..].trim().to_string();
        } else if let Some(v) = line.strip_prefix("speed=") {
            ball_speed = v.trim().parse().unwrap_or(DEFAULT_BALL_SPEED);
        } else if let Some(v) = line.strip_prefix("paddle=") {
            paddle_width = v.trim().parse().unwrap_or(DEFAULT_PADDLE_WIDTH);
        } else {
            rows.push(line.trim_end().to_string());
        }
    }

    while rows.first().is_some_and(|r| r.is_empty()) {
        rows.remove(0);
    }
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }
    if rows.is_empty() {
        return None;
    }

    if name.is_empty() {
        name = "Unnamed Level".to_string();
    }
    Some(LevelInfo { name, rows, ball_speed, paddle_width })
}

/// `# Plateau` is a name; `###  ###` is brick data.
fn is_name_line(line: &str) -> bool {
    line.starts_with('#') && line[1..].chars().any(|c| c.is_alphabetic())
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const DEFS: &str = "\
# First
speed=24
paddle=8
##  ##
%%==%%
---
# Second
########
";

    #[test]
    fn parses_levels_and_directives() {
        let levels = parse_level_defs(DEFS);
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].name, "First");
        assert_eq!(levels[0].ball_speed, 24);
        assert_eq!(levels[0].paddle_width, 8);
        assert_eq!(levels[0].rows, vec!["##  ##", "%%==%%"]);
        assert_eq!(levels[1].name, "Second");
        assert_eq!(levels[1].ball_speed, DEFAULT_BALL_SPEED);
    }

    #[test]
    fn brick_row_is_not_mistaken_for_a_name() {
        let levels = parse_level_defs("########\n##    ##\n");
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].name, "Unnamed Level");
        assert_eq!(levels[0].rows.len(), 2);
    }

    #[test]
    fn empty_sections_are_skipped() {
        let levels = parse_level_defs("# Only\n##\n---\n\n---\n# Last\n##\n");
        assert_eq!(levels.len(), 2);
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("brickbreak_sets_{}_{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn reads_sets_with_paths_relative_to_the_set_file() {
        let dir = scratch_dir("ok");
        std::fs::write(dir.join("easy.txt"), "# One\n##\n").unwrap();
        let set_path = dir.join("sets.txt");
        std::fs::write(&set_path, "e:Easy\neasy.txt\n").unwrap();

        let sets = read_level_sets(&set_path).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].key, 'e');
        assert_eq!(sets[0].name, "Easy");
        assert_eq!(sets[0].levels.len(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_definition_path_is_an_error() {
        let dir = scratch_dir("missing");
        let set_path = dir.join("sets.txt");
        std::fs::write(&set_path, "e:Easy\n").unwrap();
        assert!(read_level_sets(&set_path).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn multi_char_key_is_an_error() {
        let dir = scratch_dir("badkey");
        std::fs::write(dir.join("easy.txt"), "# One\n##\n").unwrap();
        let set_path = dir.join("sets.txt");
        std::fs::write(&set_path, "easy:Easy\neasy.txt\n").unwrap();
        assert!(read_level_sets(&set_path).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
