use chrono::{DateTime, NaiveDateTime, Utc};
use icalendar::parser::{self, Component};
use serde::{Deserialize, Serialize};

use super::calendar_type::CalendarError;

/// An object as kept by the object store, iCalendar text included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub id: String,
    pub calendar_id: String,
    pub owner: String,
    pub data: String,
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    Event,
    Todo,
    Journal,
}

impl ComponentKind {
    /// Lookup order when a calendar carries more than one kind.
    pub const PRECEDENCE: [ComponentKind; 3] = [Self::Event, Self::Todo, Self::Journal];

    pub fn component_name(self) -> &'static str {
        match self {
            Self::Event => "VEVENT",
            Self::Todo => "VTODO",
            Self::Journal => "VJOURNAL",
        }
    }
}

/// The first VEVENT, VTODO or VJOURNAL of a calendar, in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarObject {
    pub kind: ComponentKind,
    pub categories: Vec<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl CalendarObject {
    pub fn parse(data: &str) -> Result<Self, CalendarError> {
        let unfolded = parser::unfold(data);
        let calendar = parser::read_calendar(&unfolded)
            .map_err(|e| CalendarError::ParseError(e.to_string()))?;

        let (kind, component) = ComponentKind::PRECEDENCE
            .iter()
            .find_map(|kind| {
                find_component(&calendar.components, kind.component_name())
                    .map(|component| (*kind, component))
            })
            .ok_or(CalendarError::NoComponent)?;

        let last_modified = component
            .properties
            .iter()
            .find(|property| property.name.as_str().eq_ignore_ascii_case("LAST-MODIFIED"))
            .and_then(|property| parse_utc_timestamp(property.val.as_str()));

        // Escapes must survive until the list is split, so CATEGORIES is
        // read from the unfolded text rather than the parsed value.
        let categories = raw_property_values(&unfolded, kind.component_name(), "CATEGORIES")
            .into_iter()
            .flat_map(split_text_list)
            .collect();

        Ok(Self {
            kind,
            categories,
            last_modified,
        })
    }
}

impl StoredObject {
    pub fn parse(&self) -> Result<CalendarObject, CalendarError> {
        CalendarObject::parse(&self.data)
    }
}

fn find_component<'c, 'a>(components: &'c [Component<'a>], name: &str) -> Option<&'c Component<'a>> {
    components.iter().find_map(|component| {
        if component.name.as_str().eq_ignore_ascii_case(name) {
            Some(component)
        } else {
            find_component(&component.components, name)
        }
    })
}

/// Values of `property` on the first `component` block of `unfolded`,
/// escapes intact. Nested blocks are skipped.
fn raw_property_values<'a>(unfolded: &'a str, component: &str, property: &str) -> Vec<&'a str> {
    let mut values = Vec::new();
    let mut inside = false;
    let mut depth = 0usize;

    for line in unfolded.lines().map(|line| line.trim_end_matches('\r')) {
        let (name, value) = split_content_line(line);
        if !inside {
            inside = name.eq_ignore_ascii_case("BEGIN") && value.eq_ignore_ascii_case(component);
            continue;
        }
        if name.eq_ignore_ascii_case("BEGIN") {
            depth += 1;
        } else if name.eq_ignore_ascii_case("END") {
            if depth == 0 {
                break;
            }
            depth -= 1;
        } else if depth == 0 && name.eq_ignore_ascii_case(property) {
            values.push(value);
        }
    }

    values
}

/// Splits a content line into its property name and value. Parameters are
/// dropped; a `:` inside a quoted parameter value does not end the name.
fn split_content_line(line: &str) -> (&str, &str) {
    let mut quoted = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            ':' if !quoted => {
                let head = &line[..idx];
                let name = head.split(';').next().unwrap_or(head);
                return (name, &line[idx + 1..]);
            }
            _ => {}
        }
    }
    (line, "")
}

/// Splits a comma-separated TEXT list on unescaped commas and unescapes
/// each item.
fn split_text_list(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('n') | Some('N') => current.push('\n'),
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            ',' => items.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_utc_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim_end_matches('Z'), "%Y%m%dT%H%M%S")
        .ok()
        .map(|naive| naive.and_utc())
}
