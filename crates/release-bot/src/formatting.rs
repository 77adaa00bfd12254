//! Reply texts.

use chrono::{Datelike, NaiveDate};
use database::MovieRelease;
use movie_catalog::MovieCandidate;

/// Reply when a subscribe search has no upcoming release.
pub const NO_RELEASES_FOUND: &str = "No movie releases found :(";

/// Reply when a subscription was stored.
pub const SUBSCRIBED: &str = "Done!";

/// Reply when a subscribe search has more than one upcoming release.
pub const AMBIGUOUS_TITLE: &str = "Found multiple movies, be more specific please.";

/// Reply when handling a message failed.
pub const APOLOGY: &str = "Sorry, something went wrong. Please try again later.";

/// How the transport should interpret reply text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Markup {
    /// Send as-is.
    #[default]
    Plain,
    /// Render `*bold*` and `` `code` `` spans.
    Markdown,
}

/// A reply ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub markup: Markup,
}

impl Reply {
    /// A plain text reply.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: Markup::Plain,
        }
    }

    /// A reply rendered as Markdown.
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: Markup::Markdown,
        }
    }
}

/// Bulleted list of search results.
pub fn render_search_results(candidates: &[MovieCandidate]) -> String {
    if candidates.is_empty() {
        return "No entry found 🤓".to_string();
    }

    let mut text = String::from("I found these entries 🍿:\n");
    for movie in candidates {
        let year = match movie.release_date {
            Some(date) => date.year().to_string(),
            None => "unknown release date".to_string(),
        };
        text.push_str(&format!("- {} ({})\n", movie.title, year));
    }
    text
}

/// Bulleted list of a chat's subscriptions.
pub fn render_subscriptions(releases: &[MovieRelease]) -> String {
    if releases.is_empty() {
        return "No subscriptions found".to_string();
    }

    let mut text = String::from("Your subscriptions are:\n");
    for release in releases {
        text.push_str(&format!(
            "- {} — {}\n",
            release.title,
            format_release_date(release.release_date)
        ));
    }
    text
}

/// Day month year, e.g. "14 Feb 2019".
pub fn format_release_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Reminder sent by the notifier.
pub fn notification_text(title: &str, days: i64) -> String {
    format!("{} will be released in {} days.", title, days)
}

/// Flag emoji for a two-letter region code, or the code itself.
pub fn region_indicator(region: &str) -> String {
    let code = region.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return code.to_string();
    }

    code.to_ascii_uppercase()
        .chars()
        .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

/// Help text listing every command.
pub fn help_text(region: &str) -> String {
    format!(
        "Looking for information about movie releases? I can help with the following questions 😌\n\
         `releases [exact] <movie title>`\n\
         `releases [exact] <movie title> year <year of release>` (the year of release can be region specific)\n\
         `subscribe to <movie title>`\n\
         `list subscriptions`\n\
         \n\
         Examples:\n\
         `release climax year 2018`\n\
         `release exact julia`\n\
         `subscribe to Alita`\n\
         \n\
         Current region: {}",
        region_indicator(region)
    )
}
