//! Locating the route setup function inside the route file.
//!
//! The route file is generated by oakhouse itself, so the locator does not
//! parse Go. [`LineScanLocator`] finds the first line carrying a declaration
//! marker and then the first later line that is exactly `}` at the
//! declaration's indentation. A stricter matcher can be plugged in through
//! [`FunctionLocator`] without touching the splicing logic.

use super::SpliceError;

/// Line range of the setup function, in `text.split('\n')` indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBounds {
    pub declaration_line: usize,
    /// Line holding the closing `}`. Equal to `declaration_line` when inline.
    pub closing_line: usize,
    /// Leading whitespace of the declaration line.
    pub indent: String,
    /// The whole function sits on one line, e.g. `func SetupRoutes(app) { }`.
    pub inline: bool,
    /// The marker that matched.
    pub marker: String,
}

/// Finds the setup function in a route file.
pub trait FunctionLocator {
    fn locate(&self, text: &str) -> Result<FunctionBounds, SpliceError>;
}

/// Line-oriented heuristic locator for oakhouse-formatted Go files.
#[derive(Debug, Clone)]
pub struct LineScanLocator {
    markers: Vec<String>,
}

impl LineScanLocator {
    /// Markers are tried in order; the first one found in the text wins.
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }
}

impl FunctionLocator for LineScanLocator {
    fn locate(&self, text: &str) -> Result<FunctionBounds, SpliceError> {
        let lines: Vec<&str> = text.split('\n').collect();

        for marker in &self.markers {
            let Some(declaration_line) = lines
                .iter()
                .position(|line| !is_comment(line) && line.contains(marker.as_str()))
            else {
                continue;
            };

            let line = lines[declaration_line];
            let indent = leading_whitespace(line).to_string();

            if inline_body(line, marker).is_some() {
                return Ok(FunctionBounds {
                    declaration_line,
                    closing_line: declaration_line,
                    indent,
                    inline: true,
                    marker: marker.clone(),
                });
            }

            let closing = format!("{indent}}}");
            let closing_line = lines
                .iter()
                .enumerate()
                .skip(declaration_line + 1)
                .find(|(_, l)| l.trim_end() == closing)
                .map(|(i, _)| i)
                .ok_or_else(|| SpliceError::UnterminatedFunction {
                    marker: marker.clone(),
                    line: declaration_line + 1,
                })?;

            return Ok(FunctionBounds {
                declaration_line,
                closing_line,
                indent,
                inline: false,
                marker: marker.clone(),
            });
        }

        Err(SpliceError::SetupFunctionNotFound {
            marker: self.markers.join(" or "),
        })
    }
}

pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with("//")
}

pub(crate) fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Byte offset of the body's opening `{` on the declaration line: the first
/// `{` after the parameter list that starts at or after `marker`.
pub(crate) fn body_open(line: &str, marker: &str) -> Option<usize> {
    let start = line.find(marker)?;
    let params = start + line[start..].find('(')?;

    let mut depth = 0usize;
    for (offset, c) in line[params..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let after = params + offset + 1;
                    return line[after..].find('{').map(|i| after + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// For a one-line function, the `(open, close)` byte offsets of its braces.
pub(crate) fn inline_body(line: &str, marker: &str) -> Option<(usize, usize)> {
    let open = body_open(line, marker)?;
    let close = line.trim_end().len().checked_sub(1)?;
    (close > open && line.as_bytes()[close] == b'}').then_some((open, close))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator() -> LineScanLocator {
        LineScanLocator::new(vec![
            "func SetupRoutes(".to_string(),
            "func SetupV1Routes(".to_string(),
        ])
    }

    #[test]
    fn test_locate_multiline_function() {
        let text = "package route\n\nfunc SetupRoutes(app *fiber.App) {\n\tapp.Get(\"/\", h)\n}\n";
        let bounds = locator().locate(text).unwrap();
        assert_eq!(bounds.declaration_line, 2);
        assert_eq!(bounds.closing_line, 4);
        assert_eq!(bounds.indent, "");
        assert!(!bounds.inline);
        assert_eq!(bounds.marker, "func SetupRoutes(");
    }

    #[test]
    fn test_locate_skips_nested_closing_braces() {
        let text = "func SetupRoutes(app *fiber.App) {\n\tapp.Get(\"/health\", func(c *fiber.Ctx) error {\n\t\treturn nil\n\t})\n}";
        let bounds = locator().locate(text).unwrap();
        assert_eq!(bounds.closing_line, 4);
    }

    #[test]
    fn test_locate_inline_function() {
        let bounds = locator().locate("func SetupRoutes(args...) { }").unwrap();
        assert!(bounds.inline);
        assert_eq!(bounds.closing_line, bounds.declaration_line);
    }

    #[test]
    fn test_locate_falls_back_to_second_marker() {
        let text = "func SetupV1Routes(api fiber.Router, db *adapter.DatabaseAdapter) {\n\tv1 := api.Group(\"/v1\")\n}\n";
        let bounds = locator().locate(text).unwrap();
        assert_eq!(bounds.marker, "func SetupV1Routes(");
    }

    #[test]
    fn test_locate_ignores_commented_declaration() {
        let text = "// func SetupRoutes(app *fiber.App) {\n// }\n";
        let err = locator().locate(text).unwrap_err();
        assert!(matches!(err, SpliceError::SetupFunctionNotFound { .. }));
    }

    #[test]
    fn test_locate_not_found_names_markers() {
        let err = locator().locate("package route\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("func SetupRoutes("));
        assert!(msg.contains("func SetupV1Routes("));
    }

    #[test]
    fn test_locate_unterminated() {
        let text = "func SetupRoutes(app *fiber.App) {\n\tapp.Get(\"/\", h)\n";
        let err = locator().locate(text).unwrap_err();
        assert_eq!(
            err,
            SpliceError::UnterminatedFunction {
                marker: "func SetupRoutes(".into(),
                line: 1
            }
        );
    }

    #[test]
    fn test_locate_respects_indentation() {
        let text = "\tfunc SetupRoutes(app *fiber.App) {\n}\n\t}\n";
        let bounds = locator().locate(text).unwrap();
        assert_eq!(bounds.indent, "\t");
        assert_eq!(bounds.closing_line, 2);
    }

    #[test]
    fn test_body_open_skips_braces_in_params() {
        let line = "func SetupRoutes(m map[string]struct{}) {";
        assert_eq!(body_open(line, "func SetupRoutes("), Some(line.len() - 1));
    }
}
