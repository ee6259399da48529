//! iCalendar (RFC 5545) text output: content lines, CRLF endings, text
//! escaping and 75-octet line folding.

use crate::assemble::CalendarEvent;
use chrono::NaiveDate;

/// Maximum content-line length in octets (not characters) per RFC 5545.
const MAX_LINE_OCTETS: usize = 75;

const PRODID: &str = "-//US Holidays Calendar//holiday-tool//EN";
const UID_DOMAIN: &str = "holiday-tool";

/// Serialize events into a complete VCALENDAR document.
///
/// Output is deterministic: identical events in identical order produce a
/// byte-identical document, so generated files stay diffable.
pub fn write_calendar(events: &[CalendarEvent]) -> String {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, &format!("PRODID:{PRODID}"));
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, "REFRESH-INTERVAL;VALUE=DURATION:P1M");
    for event in events {
        write_event(&mut out, event);
    }
    push_line(&mut out, "END:VCALENDAR");
    out
}

fn write_event(out: &mut String, event: &CalendarEvent) {
    push_line(out, "BEGIN:VEVENT");
    push_line(
        out,
        &format!(
            "UID:{}-{}@{}",
            event.date.format("%Y-%m-%d"),
            escape_text(&event.name),
            UID_DOMAIN
        ),
    );
    push_line(out, &format!("DTSTART;VALUE=DATE:{}", format_date(event.date)));
    push_line(out, &format!("SUMMARY:{}", escape_text(&event.name)));
    if let Some(description) = &event.description {
        push_line(out, &format!("DESCRIPTION:{}", escape_text(description)));
    }
    if event.annual {
        push_line(out, "RRULE:FREQ=YEARLY");
    }
    for days in &event.reminder_days {
        write_alarm(out, &event.name, *days);
    }
    push_line(out, "END:VEVENT");
}

fn write_alarm(out: &mut String, name: &str, days: u32) {
    push_line(out, "BEGIN:VALARM");
    push_line(out, "ACTION:DISPLAY");
    push_line(
        out,
        &format!("DESCRIPTION:Reminder: {}", escape_text(name)),
    );
    push_line(out, &format!("TRIGGER:-P{days}D"));
    push_line(out, "END:VALARM");
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(&fold_line(line));
    out.push_str("\r\n");
}

/// Escape TEXT property values: backslash, semicolon, comma and newline.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Fold a content line at 75 octets with CRLF + space continuations,
/// splitting only at UTF-8 character boundaries.
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut current_len = 0;
    let mut first_segment = true;

    for c in line.chars() {
        let char_len = c.len_utf8();
        // Continuation lines start with a space that counts against the limit.
        let effective_max = if first_segment {
            MAX_LINE_OCTETS
        } else {
            MAX_LINE_OCTETS - 1
        };

        if current_len + char_len > effective_max {
            result.push_str("\r\n ");
            current_len = 0;
            first_segment = false;
        }

        result.push(c);
        current_len += char_len;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_line_unchanged() {
        let line = "SUMMARY:Independence Day";
        assert_eq!(fold_line(line), line);
    }

    #[test]
    fn fold_at_75_octets() {
        let line = "X".repeat(80);
        let folded = fold_line(&line);
        let first: String = folded.chars().take_while(|&c| c != '\r').collect();
        assert_eq!(first.len(), 75);
        assert!(folded.contains("\r\n "));
    }

    #[test]
    fn fold_respects_utf8_boundaries() {
        let line = format!("DESCRIPTION:{}", "ä".repeat(60));
        let folded = fold_line(&line);
        for part in folded.split("\r\n ") {
            assert!(part.is_char_boundary(part.len()));
        }
    }

    #[test]
    fn escape_special_characters() {
        assert_eq!(escape_text("a,b;c\\d"), "a\\,b\\;c\\\\d");
        assert_eq!(escape_text("line1\nline2"), "line1\\nline2");
    }
}
