//! # Detail Codec
//!
//! Encodes one enumerated answer as `<detail> {<option>}` inside free text,
//! and finds it again.
//!
//! Writing performs no validation; reading only ever returns an option from
//! the schema, so an unknown option reads the same as an absent one.

use super::catalogue::{ServiceDetail, SERVICE_DETAILS};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

/// Compiled patterns for the catalogue, keyed by detail text.
static CATALOGUE_PATTERNS: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    SERVICE_DETAILS
        .iter()
        .filter_map(|sd| compile(sd).map(|re| (sd.detail, re)))
        .collect()
});

fn compile(schema: &ServiceDetail) -> Option<Regex> {
    let options = schema
        .options
        .iter()
        .map(|opt| regex::escape(opt))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"{} \{{({})\}}", regex::escape(schema.detail), options);
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            debug!(detail = schema.detail, error = %e, "Detail pattern failed to compile");
            None
        }
    }
}

/// Render `option` as an embeddable detail.
pub fn write(option: &str, schema: &ServiceDetail) -> String {
    format!("{} {{{}}}", schema.detail, option)
}

/// Find the first embedded answer for `schema` in `text`, or `None`.
pub fn read_option(text: &str, schema: &ServiceDetail) -> Option<&'static str> {
    let captured = match CATALOGUE_PATTERNS.get(schema.detail) {
        Some(re) if SERVICE_DETAILS.contains(schema) => capture(re, text),
        _ => compile(schema).and_then(|re| capture(&re, text)),
    }?;
    schema.options.iter().copied().find(|opt| *opt == captured)
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Find the first embedded answer for `schema` in `text`; empty if absent.
pub fn read(text: &str, schema: &ServiceDetail) -> String {
    read_option(text, schema).unwrap_or_default().to_string()
}

/// Whether `text` mentions the detail at all, valid option or not.
pub fn mentions(text: &str, schema: &ServiceDetail) -> bool {
    text.contains(&format!("{} {{", schema.detail))
}
