//! Package metadata used to derive default refs.
//!
//! Only the small subset of RPM macro syntax that spec files use for
//! versions is understood: `%global` definitions and `%{name}`,
//! `%{?name}` and `%{?name:text}` references. Undefined plain references
//! are left as they are.

use std::collections::HashMap;

use crate::error::{SpecError, SpecResult};

/// Expanded value of `%global upstream_version`.
pub fn upstream_version(text: &str) -> SpecResult<String> {
    let mut globals = Globals::default();
    for line in text.lines() {
        if let Some((name, value)) = globals.define(line) {
            if name == "upstream_version" {
                return Ok(value);
            }
        }
    }
    Err(SpecError::MissingMetadata("%global upstream_version"))
}

/// Expanded `Release:` value, with an undefined `%{?dist}` dropped.
pub fn release(text: &str) -> SpecResult<String> {
    let mut globals = Globals::default();
    for line in text.lines() {
        globals.define(line);
        if let Some(value) = line.trim().strip_prefix("Release:") {
            let value = globals.expand(value.trim());
            if !value.is_empty() {
                return Ok(value);
            }
        }
    }
    Err(SpecError::MissingMetadata("Release"))
}

#[derive(Default)]
struct Globals {
    values: HashMap<String, String>,
}

impl Globals {
    /// Record a `%global name value` line, expanding the value against the
    /// definitions seen so far.
    fn define(&mut self, line: &str) -> Option<(String, String)> {
        let rest = line.trim().strip_prefix("%global")?;
        if !rest.starts_with([' ', '\t']) {
            return None;
        }
        let (name, value) = rest.trim().split_once(char::is_whitespace)?;
        let value = self.expand(value.trim());
        self.values.insert(name.to_string(), value.clone());
        Some((name.to_string(), value))
    }

    fn expand(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            if let Some(tail) = after.strip_prefix('%') {
                out.push('%');
                rest = tail;
                continue;
            }
            let Some(inner_end) = after.strip_prefix('{').and_then(|a| a.find('}')) else {
                out.push('%');
                rest = after;
                continue;
            };
            let inner = &after[1..=inner_end];
            out.push_str(&self.expand_macro(inner));
            rest = &after[inner_end + 2..];
        }
        out.push_str(rest);
        out
    }

    fn expand_macro(&self, inner: &str) -> String {
        match inner.strip_prefix('?') {
            Some(conditional) => {
                let (name, alt) = match conditional.split_once(':') {
                    Some((name, alt)) => (name, Some(alt)),
                    None => (conditional, None),
                };
                match (self.values.get(name), alt) {
                    (Some(_), Some(alt)) => self.expand(alt),
                    (Some(value), None) => value.clone(),
                    (None, _) => String::new(),
                }
            }
            None => match self.values.get(inner) {
                Some(value) => value.clone(),
                None => format!("%{{{inner}}}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = "\
Name: python3.12
%global pybasever 3.12
%global general_version %{pybasever}.0
%global prerel b4
%global upstream_version %{general_version}%{?prerel}
Version: %{general_version}%{?prerel:~%{prerel}}
Release: 3%{?dist}
";

    #[test]
    fn upstream_version_expands_globals() {
        assert_eq!(upstream_version(SPEC).unwrap(), "3.12.0b4");
    }

    #[test]
    fn undefined_conditional_is_empty() {
        let text = "%global general_version 3.11.2\n%global upstream_version %{general_version}%{?prerel}\n";
        assert_eq!(upstream_version(text).unwrap(), "3.11.2");
    }

    #[test]
    fn release_drops_dist() {
        assert_eq!(release(SPEC).unwrap(), "3");
    }

    #[test]
    fn missing_fields() {
        assert_eq!(
            upstream_version("Name: x\n"),
            Err(SpecError::MissingMetadata("%global upstream_version"))
        );
        assert_eq!(release("Name: x\n"), Err(SpecError::MissingMetadata("Release")));
    }

    #[test]
    fn expansion_edge_cases() {
        let mut globals = Globals::default();
        globals.define("%global name python");
        assert_eq!(globals.expand("%%{name}"), "%{name}");
        assert_eq!(globals.expand("%{unknown}-%{name}"), "%{unknown}-python");
        assert_eq!(globals.expand("100%"), "100%");
        assert_eq!(globals.expand("%{?name:yes}%{?other:no}"), "yes");
        assert_eq!(globals.expand("%{unterminated"), "%{unterminated");
    }

    #[test]
    fn global_requires_whitespace() {
        let mut globals = Globals::default();
        assert!(globals.define("%globalx y").is_none());
        assert_eq!(
            globals.define("%global\twith_tabs 1"),
            Some(("with_tabs".to_string(), "1".to_string()))
        );
    }
}
