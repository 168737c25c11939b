//! Conversion between dotted token paths and slash-separated store names.
//!
//! Declarative sources write `bg.page.primary`; the store wants
//! `bg/page/primary`. Everything in the crate goes through this module for
//! that substitution: [`token_name`] for names read from requests,
//! [`join_segments`] for names built from parts and [`reference_to`] for
//! references pointing back at a store name.

use once_cell::sync::Lazy;
use regex::Regex;
use varsync_core::utils::string_utils::{to_camel_case, to_kebab_case, to_title_case};

use crate::error::NamingError;

/// Separator used by declarative token paths.
pub const PATH_SEPARATOR: char = '.';
/// Separator used by store variable names.
pub const STORE_SEPARATOR: char = '/';

static NUMERIC_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("numeric run pattern is valid"));

/// Converts a dotted path to a store name and validates its structure.
///
/// Input already using `/` is validated as-is.
///
/// # Errors
///
/// [`NamingError`] for an empty path, an empty segment (`a..b`) or a leading
/// or trailing separator (`/a/b`).
pub fn normalize_path(path: &str) -> Result<String, NamingError> {
    let trimmed = path.trim();
    let name = trimmed.replace(PATH_SEPARATOR, "/");
    validate_store_name(&name, path)?;
    Ok(name)
}

fn validate_store_name(name: &str, original: &str) -> Result<(), NamingError> {
    if name.is_empty() {
        return Err(NamingError::EmptyPath);
    }
    if name.starts_with(STORE_SEPARATOR) || name.ends_with(STORE_SEPARATOR) {
        return Err(NamingError::DanglingSeparator { path: original.to_string() });
    }
    if name.split(STORE_SEPARATOR).any(|segment| segment.trim().is_empty()) {
        return Err(NamingError::EmptySegment { path: original.to_string() });
    }
    Ok(())
}

/// Converts a store name back to a dotted path.
pub fn denormalize_path(name: &str) -> String {
    name.replace(STORE_SEPARATOR, ".")
}

/// Parses a `{a.b.c}` reference (braces optional) into a store name.
pub fn parse_reference(raw: &str) -> Result<String, NamingError> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(trimmed);
    token_name(inner)
}

/// The store name a token declared at `path` is kept under: the normalized
/// path with repeated segments removed.
///
/// Token creation, references, direct aliases and deletions by name all look
/// names up through this, so a declared path always finds its own variable.
pub fn token_name(path: &str) -> Result<String, NamingError> {
    normalize_path(path).map(|name| dedupe_segments(&name))
}

/// The `{a.b.c}` reference pointing at the store name `name`.
pub fn reference_to(name: &str) -> String {
    format!("{{{}}}", denormalize_path(name))
}

/// Joins name segments with the store separator.
pub fn join_segments<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut name = String::new();
    for segment in segments {
        if !name.is_empty() {
            name.push(STORE_SEPARATOR);
        }
        name.push_str(segment.as_ref());
    }
    name
}

/// Removes adjacent repeated segments, compared case-insensitively.
///
/// When a segment extends its predecessor with a hyphenated suffix the more
/// specific segment replaces it: `primary/primary-hover` becomes
/// `primary-hover`.
pub fn dedupe_segments(name: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in name.split(STORE_SEPARATOR) {
        match segments.last() {
            Some(last) if last.eq_ignore_ascii_case(segment) => {}
            Some(last) if is_hyphenated_extension(last, segment) => {
                if let Some(slot) = segments.last_mut() {
                    *slot = segment;
                }
            }
            _ => segments.push(segment),
        }
    }
    join_segments(segments)
}

fn is_hyphenated_extension(base: &str, candidate: &str) -> bool {
    candidate.len() > base.len() + 1
        && candidate.is_char_boundary(base.len())
        && candidate[..base.len()].eq_ignore_ascii_case(base)
        && candidate[base.len()..].starts_with('-')
}

/// Converts a store name to a human-readable label: `bg/page-primary` becomes
/// `Bg / Page Primary`.
pub fn display_name(name: &str) -> String {
    name.split(STORE_SEPARATOR)
        .map(to_title_case)
        .collect::<Vec<_>>()
        .join(" / ")
}

pub fn kebab_to_camel(input: &str) -> String {
    to_camel_case(input)
}

pub fn camel_to_kebab(input: &str) -> String {
    to_kebab_case(input)
}

/// The last numeric run in `raw`, e.g. `999` for `brand-999-theme`.
pub fn trailing_number(raw: &str) -> Option<f64> {
    NUMERIC_RUN
        .find_iter(raw)
        .last()
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
