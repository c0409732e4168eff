//! Scanned view of a route file, rebuilt from text on every splice.

use super::locate::{inline_body, is_comment, leading_whitespace, FunctionBounds, FunctionLocator};
use super::{RouteLayout, SpliceError};

/// What the splicer knows about the route file before editing it.
#[derive(Debug, Clone)]
pub struct RouteFileState<'a> {
    pub raw_text: &'a str,
    pub function_bounds: FunctionBounds,
    pub group_declaration_present: bool,
    /// Line of the group declaration, when present.
    pub group_declaration_index: Option<usize>,
    /// Lines of the section comments inside the function, in file order.
    pub section_comment_indices: Vec<usize>,
    /// Resources registered inside the function, in file order.
    pub existing_registrations: Vec<String>,
    /// Name of the setup function's first parameter (`app`, `api`).
    pub router_param: String,
    /// Indentation used for statements in the function body.
    pub body_indent: String,
}

impl<'a> RouteFileState<'a> {
    /// Locate the setup function and scan its body.
    pub fn scan<L: FunctionLocator + ?Sized>(
        text: &'a str,
        locator: &L,
        layout: &RouteLayout,
    ) -> Result<Self, SpliceError> {
        let bounds = locator.locate(text)?;
        let lines: Vec<&str> = text.split('\n').collect();
        let declaration = lines[bounds.declaration_line];
        let router_param = first_param(declaration, &bounds.marker).unwrap_or_else(|| "app".into());

        if bounds.inline {
            let body = inline_body(declaration, &bounds.marker)
                .map(|(open, close)| &declaration[open + 1..close])
                .unwrap_or_default();
            return Ok(Self {
                raw_text: text,
                group_declaration_present: is_group_declaration(body, &layout.group_var),
                group_declaration_index: None,
                section_comment_indices: Vec::new(),
                existing_registrations: registration_name(body)
                    .map(|name| vec![name.to_string()])
                    .unwrap_or_default(),
                router_param,
                body_indent: format!("{}\t", bounds.indent),
                function_bounds: bounds,
            });
        }

        let body = bounds.declaration_line + 1..bounds.closing_line;
        let group_declaration_index = body
            .clone()
            .find(|&i| is_group_declaration(lines[i], &layout.group_var));
        let section_comment_indices = body
            .clone()
            .filter(|&i| lines[i].trim_start().starts_with(layout.section_comment.as_str()))
            .collect();
        let existing_registrations = body
            .clone()
            .filter_map(|i| registration_name(lines[i]))
            .map(str::to_string)
            .collect();
        let body_indent = body
            .map(|i| lines[i])
            .find(|l| !l.trim().is_empty())
            .map(|l| leading_whitespace(l).to_string())
            .unwrap_or_else(|| format!("{}\t", bounds.indent));

        Ok(Self {
            raw_text: text,
            group_declaration_present: group_declaration_index.is_some(),
            group_declaration_index,
            section_comment_indices,
            existing_registrations,
            router_param,
            body_indent,
            function_bounds: bounds,
        })
    }

    pub fn is_registered(&self, resource: &str) -> bool {
        self.existing_registrations.iter().any(|r| r == resource)
    }
}

/// `v1 := api.Group("/v1")` style declaration of `group_var`.
fn is_group_declaration(line: &str, group_var: &str) -> bool {
    if is_comment(line) {
        return false;
    }
    line.trim_start()
        .strip_prefix(group_var)
        .is_some_and(|rest| rest.trim_start().starts_with(":=") && rest.contains(".Group("))
}

/// Resource name of a `Setup<Name>Routes(` call on a non-comment line.
pub(crate) fn registration_name(line: &str) -> Option<&str> {
    if is_comment(line) {
        return None;
    }
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';

    let mut from = 0;
    while let Some(found) = line[from..].find("Setup") {
        let start = from + found;
        from = start + "Setup".len();

        if line[..start].chars().next_back().is_some_and(is_ident) {
            continue;
        }
        let rest = &line[from..];
        let ident_len = rest.find(|c: char| !is_ident(c)).unwrap_or(rest.len());
        let ident = &rest[..ident_len];
        if !rest[ident_len..].starts_with('(') {
            continue;
        }
        if let Some(name) = ident.strip_suffix("Routes") {
            if !name.is_empty() {
                return Some(name);
            }
        }
    }
    None
}

/// First parameter name of the function declared on `line`.
fn first_param(line: &str, marker: &str) -> Option<String> {
    let start = line.find(marker)?;
    let params = start + line[start..].find('(')? + 1;
    let name: String = line[params..]
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::super::locate::LineScanLocator;
    use super::*;

    fn scan(text: &str) -> RouteFileState<'_> {
        let layout = RouteLayout::default();
        let locator = LineScanLocator::new(layout.setup_markers.clone());
        RouteFileState::scan(text, &locator, &layout).unwrap()
    }

    #[test]
    fn test_registration_name() {
        assert_eq!(registration_name("\tSetupUserRoutes(v1)"), Some("User"));
        assert_eq!(registration_name("\troute.SetupBlogPostRoutes(v1)"), Some("BlogPost"));
        assert_eq!(registration_name("\t// SetupUserRoutes(v1)"), None);
        assert_eq!(registration_name("\tSetupRoutes(app, db)"), None);
        assert_eq!(registration_name("\tXSetupUserRoutes(v1)"), None);
        assert_eq!(registration_name("\tSetupUserRoutesTable"), None);
    }

    #[test]
    fn test_scan_collects_registrations_in_order() {
        let text = "func SetupV1Routes(api fiber.Router) {\n\tv1 := api.Group(\"/v1\")\n\n\t// Setup resource routes\n\tSetupUserRoutes(v1)\n\tSetupPostRoutes(v1)\n}\n";
        let state = scan(text);
        assert_eq!(state.existing_registrations, ["User", "Post"]);
        assert!(state.group_declaration_present);
        assert_eq!(state.group_declaration_index, Some(1));
        assert_eq!(state.section_comment_indices, [3]);
        assert_eq!(state.router_param, "api");
        assert_eq!(state.body_indent, "\t");
        assert!(state.is_registered("Post"));
        assert!(!state.is_registered("Comment"));
    }

    #[test]
    fn test_scan_ignores_lines_outside_function() {
        let text = "// SetupUserRoutes(v1) is registered below\nfunc SetupRoutes(app *fiber.App) {\n}\n\nfunc other() {\n\tSetupUserRoutes(v1)\n}\n";
        let state = scan(text);
        assert!(state.existing_registrations.is_empty());
        assert!(!state.group_declaration_present);
        assert_eq!(state.router_param, "app");
    }

    #[test]
    fn test_scan_inline_function() {
        let state = scan("func SetupRoutes(args...) { }");
        assert!(state.function_bounds.inline);
        assert_eq!(state.router_param, "args");
        assert_eq!(state.body_indent, "\t");
        assert!(state.existing_registrations.is_empty());
    }

    #[test]
    fn test_group_declaration_requires_group_call() {
        assert!(is_group_declaration("\tv1 := app.Group(\"/api/v1\")", "v1"));
        assert!(!is_group_declaration("\tv1 := something()", "v1"));
        assert!(!is_group_declaration("\t// v1 := app.Group(\"/v1\")", "v1"));
        assert!(!is_group_declaration("\tv10 := app.Group(\"/v10\")", "v1"));
    }
}
