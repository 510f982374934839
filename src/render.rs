//! Pure mapping from [`FeedState`] to what the screen shows.
//!
//! Nothing here touches the network or the terminal; `tui` draws the
//! [`Screen`] and `list` mode prints it.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use textwrap::core::display_width;

use crate::feed::FeedState;
use crate::models::JobPosting;

pub const HEADING: &str = "📡 Job Radar";
pub const SCANNING: &str = "Scanning frequencies...";
pub const REMOTE: &str = "Remote";
pub const INVALID_DATE: &str = "Invalid Date";
pub const TITLE_LINES: usize = 2;

const MIN_WIDTH: usize = 8;
const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub heading: &'static str,
    pub badge: String,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Scanning,
    Cards(Vec<Card>),
    /// Failed feed: neither the indicator nor a list.
    Blank,
}

/// One posting, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub key: i64,
    pub title: Vec<String>,
    pub company: String,
    pub location: String,
    pub posted: String,
    pub source: String,
    pub salary: Option<String>,
    pub url: String,
}

pub fn screen(state: &FeedState, width: usize) -> Screen {
    let body = match state {
        FeedState::Loading => Body::Scanning,
        FeedState::Loaded(postings) => {
            Body::Cards(postings.iter().map(|p| card(p, width)).collect())
        }
        FeedState::Failed => Body::Blank,
    };

    Screen {
        heading: HEADING,
        badge: badge(state.count()),
        body,
    }
}

pub fn badge(count: usize) -> String {
    format!("{} Active Listings", count)
}

pub fn card(posting: &JobPosting, width: usize) -> Card {
    Card {
        key: posting.id,
        title: clamp_title(&posting.title, width, TITLE_LINES),
        company: posting.company.clone(),
        location: location_label(posting.location.as_deref()),
        posted: posted_date(&posting.date_posted),
        source: capitalize(&posting.source),
        salary: posting
            .salary_range
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        url: posting.url.clone(),
    }
}

/// Wrap `title` to `width` columns and keep at most `max_lines`, marking a cut with an ellipsis.
pub fn clamp_title(title: &str, width: usize, max_lines: usize) -> Vec<String> {
    let width = width.max(MIN_WIDTH);
    let max_lines = max_lines.max(1);

    let mut lines: Vec<String> = textwrap::wrap(title, width)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            // Leave one column for the ellipsis
            let mut kept = String::new();
            for c in last.chars() {
                kept.push(c);
                if display_width(&kept) > width - 1 {
                    kept.pop();
                    break;
                }
            }
            kept.truncate(kept.trim_end().len());
            kept.push(ELLIPSIS);
            *last = kept;
        }
    }
    lines
}

pub fn location_label(location: Option<&str>) -> String {
    match location.map(str::trim) {
        Some(loc) if !loc.is_empty() => loc.to_string(),
        _ => REMOTE.to_string(),
    }
}

/// Calendar date in the viewer's local time, e.g. `3/15/2024`.
pub fn posted_date(raw: &str) -> String {
    match parse_posted(raw) {
        Some(date) => date.format("%-m/%-d/%Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn parse_posted(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Local).date_naive());
    }
    // No offset: local wall-clock time, as a browser reads it
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.date());
    }
    // Bare date: UTC midnight, as a browser reads it
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?);
    Some(midnight.with_timezone(&Local).date_naive())
}

/// Upper-case the first letter of every word.
pub fn capitalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = c.is_whitespace();
        }
    }
    out
}

/// Plain-text rendition used by `radar list`.
pub fn to_text(screen: &Screen) -> String {
    let mut out = format!("{}  [{}]\n\n", screen.heading, screen.badge);

    match &screen.body {
        Body::Scanning => {
            out.push_str(SCANNING);
            out.push('\n');
        }
        Body::Blank => {}
        Body::Cards(cards) => {
            for card in cards {
                for line in &card.title {
                    out.push_str(line);
                    out.push('\n');
                }
                out.push_str(&format!("  {}\n", card.company));
                out.push_str(&format!("  📍 {}\n", card.location));
                out.push_str(&format!("  📅 {}\n", card.posted));
                out.push_str(&format!("  🔗 {}\n", card.source));
                if let Some(salary) = &card.salary {
                    out.push_str(&format!("  💰 {}\n", salary));
                }
                out.push_str(&format!("  {}\n\n", card.url));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(id: i64) -> JobPosting {
        JobPosting {
            id,
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            location: Some(String::new()),
            url: format!("https://x.test/{}", id),
            date_posted: "2024-01-02T00:00:00Z".to_string(),
            source: "linkedin".to_string(),
            salary_range: None,
        }
    }

    fn local_date(instant: &str) -> String {
        DateTime::parse_from_rfc3339(instant)
            .unwrap()
            .with_timezone(&Local)
            .date_naive()
            .format("%-m/%-d/%Y")
            .to_string()
    }

    #[test]
    fn test_loading_shows_scanning_and_zero_badge() {
        let screen = screen(&FeedState::Loading, 40);
        assert_eq!(screen.body, Body::Scanning);
        assert_eq!(screen.badge, "0 Active Listings");
    }

    #[test]
    fn test_failed_shows_neither_indicator_nor_list() {
        let screen = screen(&FeedState::Failed, 40);
        assert_eq!(screen.body, Body::Blank);
        assert_eq!(screen.badge, "0 Active Listings");
        assert!(!to_text(&screen).contains(SCANNING));
    }

    #[test]
    fn test_empty_feed_has_no_cards() {
        let screen = screen(&FeedState::Loaded(Vec::new()), 40);
        assert_eq!(screen.body, Body::Cards(Vec::new()));
        assert_eq!(screen.badge, "0 Active Listings");
    }

    #[test]
    fn test_loaded_cards_follow_feed_order() {
        let state = FeedState::Loaded(vec![posting(9), posting(4), posting(7)]);
        let screen = screen(&state, 40);

        assert_eq!(screen.badge, "3 Active Listings");
        let Body::Cards(cards) = screen.body else {
            panic!("expected cards");
        };
        let keys: Vec<i64> = cards.iter().map(|c| c.key).collect();
        assert_eq!(keys, vec![9, 4, 7]);
    }

    #[test]
    fn test_end_to_end_card() {
        let raw = r#"[{"id":1,"title":"Backend Engineer","company":"Acme","location":"","url":"https://x.test/1","date_posted":"2024-01-02T00:00:00Z","source":"linkedin"}]"#;
        let postings: Vec<JobPosting> = serde_json::from_str(raw).unwrap();
        let screen = screen(&FeedState::Loaded(postings), 40);

        assert_eq!(screen.badge, "1 Active Listings");
        let Body::Cards(cards) = &screen.body else {
            panic!("expected cards");
        };
        let card = &cards[0];
        assert_eq!(card.title, vec!["Backend Engineer".to_string()]);
        assert_eq!(card.company, "Acme");
        assert_eq!(card.location, "Remote");
        assert_eq!(card.posted, local_date("2024-01-02T00:00:00Z"));
        assert_eq!(card.source, "Linkedin");
        assert_eq!(card.url, "https://x.test/1");
    }

    #[test]
    fn test_location_defaults_to_remote() {
        assert_eq!(location_label(Some("")), "Remote");
        assert_eq!(location_label(Some("   ")), "Remote");
        assert_eq!(location_label(None), "Remote");
        assert_eq!(location_label(Some("Berlin")), "Berlin");
    }

    #[test]
    fn test_posted_date_is_local_calendar_date() {
        let shown = posted_date("2024-03-15T00:00:00Z");
        assert_ne!(shown, "2024-03-15T00:00:00Z");
        assert_eq!(shown, local_date("2024-03-15T00:00:00Z"));
    }

    #[test]
    fn test_posted_date_other_shapes() {
        assert_eq!(posted_date("2024-03-15T09:30:00.123456"), "3/15/2024");
        assert_eq!(posted_date("2024-03-15"), local_date("2024-03-15T00:00:00Z"));
        assert_eq!(posted_date("yesterday"), INVALID_DATE);
        assert_eq!(posted_date(""), INVALID_DATE);
    }

    #[test]
    fn test_capitalize_is_visual_only() {
        let p = posting(1);
        let card = card(&p, 40);
        assert_eq!(card.source, "Linkedin");
        assert_eq!(p.source, "linkedin");
        assert_eq!(capitalize("we work remotely"), "We Work Remotely");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
    }

    #[test]
    fn test_clamp_title_short_is_untouched() {
        assert_eq!(clamp_title("Rust Dev", 20, 2), vec!["Rust Dev".to_string()]);
    }

    #[test]
    fn test_clamp_title_long_stops_at_two_lines() {
        let title = "Principal Distributed Systems Engineer for Planet Scale Storage and Streaming";
        let lines = clamp_title(title, 20, 2);

        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with('…'));
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
    }

    #[test]
    fn test_clamp_title_never_panics_on_odd_input() {
        let unbroken = "x".repeat(500);
        assert_eq!(clamp_title(&unbroken, 0, 2).len(), 2);
        assert_eq!(clamp_title("", 30, 2).len(), 1);
        let multibyte = "日本語のタイトル".repeat(40);
        assert!(clamp_title(&multibyte, 12, 2).len() <= 2);
    }

    #[test]
    fn test_clamp_title_wide_characters_fit_the_card() {
        let multibyte = "日本語のタイトル".repeat(40);
        let lines = clamp_title(&multibyte, 12, 2);

        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with('…'));
        for line in &lines {
            assert!(display_width(line) <= 12, "{:?} is too wide", line);
        }
    }

    #[test]
    fn test_salary_line_only_when_present() {
        let mut p = posting(1);
        assert_eq!(card(&p, 40).salary, None);
        p.salary_range = Some("$200k".to_string());
        assert_eq!(card(&p, 40).salary.as_deref(), Some("$200k"));
    }

    #[test]
    fn test_to_text_lists_cards() {
        let screen = screen(&FeedState::Loaded(vec![posting(1)]), 40);
        let text = to_text(&screen);
        assert!(text.contains("1 Active Listings"));
        assert!(text.contains("Backend Engineer"));
        assert!(text.contains("Remote"));
        assert!(text.contains("Linkedin"));
        assert!(!text.contains(SCANNING));
    }
}
