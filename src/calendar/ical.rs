use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::calendar::Event;
use crate::model::local_midnight;

/// Pull the events on `target` out of a raw iCalendar feed body.
///
/// This is a deliberately small reader, not a full RFC 5545 parser: it walks
/// VEVENT blocks, keeps the properties the timeline displays, and skips
/// anything it cannot understand rather than failing the whole feed.
pub fn parse_events(data: &str, target: NaiveDate) -> Vec<Event> {
    let mut events = Vec::new();
    let mut current: Option<PartialEvent> = None;

    for line in data.lines() {
        let line = line.trim_end_matches('\r');
        if line.starts_with("BEGIN:VEVENT") {
            current = Some(PartialEvent::default());
            continue;
        }
        if line.starts_with("END:VEVENT") {
            if let Some(partial) = current.take() {
                if let Some(event) = partial.build(target) {
                    events.push(event);
                }
            }
            continue;
        }
        let Some(partial) = current.as_mut() else {
            continue;
        };
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.to_uppercase();
        // Property parameters ride after a ';' in the key (DTSTART;TZID=...).
        let name = key.split(';').next().unwrap_or("");
        match name {
            "SUMMARY" => partial.summary = value.to_string(),
            "DESCRIPTION" => partial.description = value.to_string(),
            "LOCATION" => partial.location = value.to_string(),
            "DTSTART" => partial.start = parse_datetime(value),
            "DTEND" => partial.end = parse_datetime(value),
            _ => {}
        }
    }
    events
}

#[derive(Default)]
struct PartialEvent {
    summary: String,
    description: String,
    location: String,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
}

impl PartialEvent {
    fn build(self, target: NaiveDate) -> Option<Event> {
        let start = self.start?;
        if start.date_naive() != target {
            return None;
        }
        Some(Event {
            summary: self.summary,
            description: self.description,
            location: self.location,
            start,
            end: self.end,
        })
    }
}

/// Parse the datetime forms feeds actually use: UTC-stamped, floating
/// local, and bare dates (all-day events land at local midnight).
fn parse_datetime(value: &str) -> Option<DateTime<Local>> {
    let value = value.trim();
    if let Ok(utc) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ") {
        return Some(Utc.from_utc_datetime(&utc).with_timezone(&Local));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S") {
        if let chrono::LocalResult::Single(dt) = Local.from_local_datetime(&naive) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y%m%d") {
        return Some(local_midnight(date));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Team standup\r\n\
DTSTART:20250602T090000\r\n\
DTEND:20250602T091500\r\n\
LOCATION:Room 4\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Dentist\r\n\
DESCRIPTION:Bring insurance card\r\n\
DTSTART:20250603T140000\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn test_parses_matching_day_only() {
        let events = parse_events(FEED, day("2025-06-02"));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Team standup");
        assert_eq!(events[0].location, "Room 4");
        assert_eq!(events[0].start.hour(), 9);
        assert!(events[0].end.is_some());
    }

    #[test]
    fn test_other_day_yields_its_own_events() {
        let events = parse_events(FEED, day("2025-06-03"));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Dentist");
        assert_eq!(events[0].description, "Bring insurance card");
        assert!(events[0].end.is_none());
    }

    #[test]
    fn test_no_events_on_empty_day() {
        assert!(parse_events(FEED, day("2025-06-04")).is_empty());
    }

    #[test]
    fn test_property_parameters_are_ignored() {
        let feed = "BEGIN:VEVENT\n\
SUMMARY;LANGUAGE=en:Planning\n\
DTSTART;TZID=America/New_York:20250602T100000\n\
END:VEVENT\n";
        let events = parse_events(feed, day("2025-06-02"));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Planning");
    }

    #[test]
    fn test_all_day_event_lands_at_midnight() {
        let feed = "BEGIN:VEVENT\nSUMMARY:Holiday\nDTSTART:20250602\nEND:VEVENT\n";
        let events = parse_events(feed, day("2025-06-02"));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start.hour(), 0);
    }

    #[test]
    fn test_event_without_start_is_skipped() {
        let feed = "BEGIN:VEVENT\nSUMMARY:Broken\nEND:VEVENT\n";
        assert!(parse_events(feed, day("2025-06-02")).is_empty());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let feed = "BEGIN:VEVENT\n\
garbage without a colon\n\
SUMMARY:Still here\n\
DTSTART:20250602T080000\n\
END:VEVENT\n";
        let events = parse_events(feed, day("2025-06-02"));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Still here");
    }

    #[test]
    fn test_utc_timestamp_is_accepted() {
        let feed = "BEGIN:VEVENT\nSUMMARY:Sync\nDTSTART:20250602T120000Z\nEND:VEVENT\n";
        let utc_day = Utc
            .with_ymd_and_hms(2025, 6, 2, 12, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Local)
            .date_naive();
        let events = parse_events(feed, utc_day);
        assert_eq!(events.len(), 1);
    }
}
