//! engine::batch
//!
//! Collects the batch of units a command operates on.
//!
//! Units come from positional arguments and, optionally, a list file with
//! one unit id per line. Blank lines and lines starting with `#` are
//! skipped. Duplicates are kept here; the sorter collapses them.
//!
//! Arguments are taken verbatim. A list line is trimmed, so a listed id
//! cannot carry surrounding whitespace, and control characters are
//! rejected as a sign of a corrupt file.

use std::fs;
use std::path::Path;

use super::EngineError;
use crate::core::types::{TypeError, UnitId};

/// Parse a unit list, one id per line.
///
/// `path` is only used to label errors.
///
/// # Errors
///
/// Returns [`EngineError::InvalidUnit`] naming the first bad line.
pub fn parse_unit_list(text: &str, path: &Path) -> Result<Vec<UnitId>, EngineError> {
    text.lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, id)| {
            listed_unit(id).map_err(|source| EngineError::InvalidUnit {
                path: path.to_path_buf(),
                line,
                source,
            })
        })
        .collect()
}

fn listed_unit(id: &str) -> Result<UnitId, TypeError> {
    if id.contains(char::is_control) {
        return Err(TypeError::InvalidUnitId(format!(
            "unit id cannot contain control characters: {id:?}"
        )));
    }
    UnitId::new(id)
}

/// Collect the batch from arguments and an optional list file.
///
/// # Errors
///
/// - [`EngineError::Type`] for an invalid unit id argument
/// - [`EngineError::ReadUnits`] if the list file cannot be read
/// - [`EngineError::EmptyBatch`] if no units were given at all
pub fn collect_units(args: &[String], from: Option<&Path>) -> Result<Vec<UnitId>, EngineError> {
    let mut units = args
        .iter()
        .map(|arg| UnitId::new(arg.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(path) = from {
        let text = fs::read_to_string(path).map_err(|source| EngineError::ReadUnits {
            path: path.to_path_buf(),
            source,
        })?;
        units.extend(parse_unit_list(&text, path)?);
    }

    if units.is_empty() {
        return Err(EngineError::EmptyBatch);
    }

    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ids(units: &[UnitId]) -> Vec<&str> {
        units.iter().map(UnitId::as_str).collect()
    }

    mod unit_list {
        use super::*;

        #[test]
        fn skips_comments_and_blanks() {
            let text = "# web stack\nWeb\n\n  Jackson  \n# trailing\nServlet\n";
            let units = parse_unit_list(text, Path::new("units.txt")).unwrap();
            assert_eq!(ids(&units), vec!["Web", "Jackson", "Servlet"]);
        }

        #[test]
        fn inner_spaces_kept() {
            let units = parse_unit_list("  Web Config  \n", Path::new("units.txt")).unwrap();
            assert_eq!(ids(&units), vec!["Web Config"]);
        }

        #[test]
        fn reports_line_of_bad_id() {
            let err = parse_unit_list("ok\nbad\u{7}id\n", Path::new("units.txt")).unwrap_err();
            match err {
                EngineError::InvalidUnit { line, .. } => assert_eq!(line, 2),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    mod collect {
        use super::*;

        #[test]
        fn args_then_file() {
            let temp = TempDir::new().unwrap();
            let list = temp.path().join("units.txt");
            fs::write(&list, "c\nb\n").unwrap();

            let units = collect_units(&["a".into()], Some(&list)).unwrap();
            assert_eq!(ids(&units), vec!["a", "c", "b"]);
        }

        #[test]
        fn empty_is_an_error() {
            assert!(matches!(
                collect_units(&[], None),
                Err(EngineError::EmptyBatch)
            ));
        }

        #[test]
        fn missing_file_is_an_error() {
            let temp = TempDir::new().unwrap();
            let result = collect_units(&[], Some(&temp.path().join("absent.txt")));
            assert!(matches!(result, Err(EngineError::ReadUnits { .. })));
        }

        #[test]
        fn arguments_taken_verbatim() {
            let units = collect_units(&[" spaced id ".into()], None).unwrap();
            assert_eq!(ids(&units), vec![" spaced id "]);
        }

        #[test]
        fn invalid_argument_rejected() {
            assert!(matches!(
                collect_units(&["".into()], None),
                Err(EngineError::Type(_))
            ));
        }
    }
}
