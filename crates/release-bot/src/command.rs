//! Command grammar.
//!
//! Input is trimmed and lowercased, then matched against an ordered rule
//! table. The year-qualified release rule comes before the bare release rule
//! because every input it accepts is also accepted by the bare rule.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Arguments of a release query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseQuery {
    /// Keep only titles containing the query.
    pub exact: bool,
    /// Movie title as typed (lowercased).
    pub title: String,
    /// Release year restriction.
    pub year: Option<u16>,
}

/// A recognized command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `releases [exact] <title>`
    Releases(ReleaseQuery),
    /// `releases [exact] <title> year <YYYY>`
    ReleasesInYear(ReleaseQuery),
    /// `subscribe to <title>`
    Subscribe { title: String },
    /// `list subscriptions`
    ListSubscriptions,
}

type Extractor = fn(&Captures<'_>) -> Command;

/// Rules in priority order.
const RULES: [(&str, Extractor); 4] = [
    (
        r"^releases?(?: (exact))? (.+) year ([0-9]{4})$",
        extract_release_with_year,
    ),
    (r"^releases?(?: (exact))? (.+)$", extract_release),
    (r"^subscribe to (.+)$", extract_subscribe),
    (r"^list subscriptions?$", extract_list_subscriptions),
];

fn rules() -> &'static [(Regex, Extractor)] {
    static COMPILED: OnceLock<Vec<(Regex, Extractor)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|(pattern, extract)| (Regex::new(pattern).unwrap(), *extract))
            .collect()
    })
}

/// Parse a chat message. `None` means no rule matched.
pub fn parse_command(text: &str) -> Option<Command> {
    let normalized = text.trim().to_lowercase();
    rules()
        .iter()
        .find_map(|(pattern, extract)| pattern.captures(&normalized).map(|caps| extract(&caps)))
}

fn release_query(caps: &Captures<'_>) -> ReleaseQuery {
    ReleaseQuery {
        exact: caps.get(1).is_some(),
        title: caps[2].trim().to_string(),
        year: caps.get(3).and_then(|m| m.as_str().parse().ok()),
    }
}

fn extract_release_with_year(caps: &Captures<'_>) -> Command {
    Command::ReleasesInYear(release_query(caps))
}

fn extract_release(caps: &Captures<'_>) -> Command {
    Command::Releases(release_query(caps))
}

fn extract_subscribe(caps: &Captures<'_>) -> Command {
    Command::Subscribe {
        title: caps[1].trim().to_string(),
    }
}

fn extract_list_subscriptions(_: &Captures<'_>) -> Command {
    Command::ListSubscriptions
}
