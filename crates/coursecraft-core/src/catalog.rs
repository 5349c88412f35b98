//! University course catalog records.
//!
//! These are the decoded forms of the REST catalog resources. The HTTP
//! client in `coursecraft-catalog` maps the backend's field names onto them.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A subject area and how many courses it offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub course_count: u32,
}

impl Subject {
    /// Case-insensitive substring match on name or id.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.id.to_lowercase().contains(&query)
    }
}

/// One course listed under a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: String,
    pub name: String,
    pub course_code: String,
}

/// The full record for a single course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseDetails {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub credits: Option<Value>,
    #[serde(default)]
    pub prerequisites: Option<Value>,
    /// Fields the backend sends that have no typed slot.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CourseDetails {
    /// Fill empty typed fields from their alternate spellings in `extra`
    /// (`course_id`, `name`, `prerequisite`), moving the value out.
    pub fn adopt_alternate_fields(&mut self) {
        if self.id.is_empty() {
            if let Some(code) = self.extra.remove("course_id") {
                self.id = match code {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
            }
        }
        if self.title.is_none() {
            if let Some(Value::String(name)) = self.extra.remove("name") {
                self.title = Some(name);
            }
        }
        if self.prerequisites.is_none() {
            self.prerequisites = self.extra.remove("prerequisite");
        }
    }

    /// Display name, falling back to the course id.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    /// Human-readable fields as a plain-text block, one `Label: value` per line.
    ///
    /// Extra scalar fields are appended in key order; nested objects and
    /// nulls are skipped.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Course: {}", self.display_title());
        let _ = writeln!(out, "Code: {}", self.id);
        if let Some(description) = &self.description {
            let _ = writeln!(out, "Description: {description}");
        }
        if let Some(credits) = self.credits.as_ref().and_then(render_value) {
            let _ = writeln!(out, "Credits: {credits}");
        }
        if let Some(prereqs) = self.prerequisites.as_ref().and_then(render_value) {
            let _ = writeln!(out, "Prerequisites: {prereqs}");
        }

        let mut keys: Vec<&String> = self.extra.keys().collect();
        keys.sort();
        for key in keys {
            if let Some(text) = self.extra.get(key).and_then(render_value) {
                let _ = writeln!(out, "{}: {text}", label_for(key));
            }
        }
        out.trim_end().to_string()
    }
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(render_value).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

/// `contact_hours` -> `Contact hours`.
fn label_for(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: &str, name: &str) -> Subject {
        Subject {
            id: id.into(),
            name: name.into(),
            course_count: 3,
        }
    }

    #[test]
    fn subject_matches_name_or_id() {
        let s = subject("CS", "Computer Science");
        assert!(s.matches("science"));
        assert!(s.matches("cs"));
        assert!(s.matches("  "));
        assert!(!s.matches("biology"));
    }

    #[test]
    fn details_decode_keeps_unknown_fields() {
        let json = r#"{
            "id": "CS101",
            "title": "Intro to Programming",
            "description": "Basics of programming.",
            "credits": 4,
            "prerequisites": ["MATH100", "CS050"],
            "contact_hours": 60,
            "syllabus": {"weeks": 12}
        }"#;
        let details: CourseDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.display_title(), "Intro to Programming");
        assert!(details.extra.contains_key("contact_hours"));

        let text = details.describe();
        assert!(text.contains("Course: Intro to Programming"));
        assert!(text.contains("Credits: 4"));
        assert!(text.contains("Prerequisites: MATH100, CS050"));
        assert!(text.contains("Contact hours: 60"));
        assert!(!text.contains("syllabus"));
    }

    #[test]
    fn both_spellings_decode_and_second_stays_extra() {
        let json = r#"{"id": "42", "course_id": "CS101", "title": "Intro", "name": "Intro to CS",
            "prerequisites": ["MATH100"], "prerequisite": "none"}"#;
        let mut details: CourseDetails = serde_json::from_str(json).unwrap();
        details.adopt_alternate_fields();
        assert_eq!(details.id, "42");
        assert_eq!(details.display_title(), "Intro");
        assert_eq!(details.extra.get("course_id"), Some(&Value::from("CS101")));
        assert_eq!(details.extra.get("name"), Some(&Value::from("Intro to CS")));
        assert_eq!(details.prerequisites, Some(serde_json::json!(["MATH100"])));
    }

    #[test]
    fn alternate_spellings_fill_empty_fields() {
        let json = r#"{"course_id": 301, "name": "Genetics", "prerequisite": "BIO100"}"#;
        let mut details: CourseDetails = serde_json::from_str(json).unwrap();
        details.adopt_alternate_fields();
        assert_eq!(details.id, "301");
        assert_eq!(details.title.as_deref(), Some("Genetics"));
        assert_eq!(details.prerequisites, Some(Value::from("BIO100")));
        assert!(details.extra.is_empty());
    }

    #[test]
    fn details_title_falls_back_to_id() {
        let details = CourseDetails {
            id: "BIO200".into(),
            ..Default::default()
        };
        assert_eq!(details.display_title(), "BIO200");
        assert_eq!(details.describe(), "Course: BIO200\nCode: BIO200");
    }

    #[test]
    fn label_for_snake_case() {
        assert_eq!(label_for("contact_hours"), "Contact hours");
        assert_eq!(label_for(""), "");
    }
}
