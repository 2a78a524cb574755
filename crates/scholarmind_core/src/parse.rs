//! crates/scholarmind_core/src/parse.rs
//!
//! Parsing of structured model output. Models are asked for rigid list
//! formats (see `prompts`), but replies still arrive with preambles, blank
//! lines, and trailing chatter; these helpers keep only the lines that match
//! the requested shape.

use regex::Regex;

/// Extracts the item texts of a numbered list (`1. text`), in order of
/// appearance. Lines that do not look like list entries are skipped, so a
/// "Here are the sub-topics:" preamble costs nothing. Items are trimmed and
/// empty ones dropped.
pub fn numbered_items(text: &str) -> Vec<String> {
    // A list entry: a line whose trimmed form starts with a digit, with the
    // item text sitting after the first ". " on the line. The lazy `.*?` is
    // what pins the split to the first occurrence.
    let list_entry = Regex::new(r"^\s*\d.*?\. (.*)$").unwrap();
    text.lines()
        .filter_map(|line| list_entry.captures(line))
        .map(|caps| caps[1].trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Extracts the description side of `Topic: Description` lines, splitting on
/// the first `": "` only. Lines without the separator are skipped.
pub fn topic_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.split_once(": "))
        .map(|(_, description)| description.trim().to_string())
        .filter(|description| !description.is_empty())
        .collect()
}

/// Renders items back into the canonical `1. ...` numbered-list form.
pub fn to_numbered_list(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}
