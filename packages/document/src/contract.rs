//! Contract form schema: field names, the class-entry row type, the blank
//! template and the sizing policy for the classes table.

use serde::{Deserialize, Serialize};

use crate::list_sizer::ListSizer;
use crate::value::{FromValue, IntoValue, Value};

pub mod fields {
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const N_NUMBER: &str = "nNumber";
    pub const BOX_NUMBER: &str = "boxNumber";
    pub const SEMESTER: &str = "semester";
    pub const CONTRACT_YEAR: &str = "contractYear";
    pub const STUDY_LOCATION: &str = "studyLocation";
    pub const EXPECTED_GRAD_YEAR: &str = "expectedGradYear";
    pub const CLASSES: &str = "classes";
    pub const GOALS: &str = "goals";
    pub const CERTIFICATION_CRITERIA: &str = "certificationCriteria";
    pub const DESCRIPTIONS_OTHER_ACTIVITIES: &str = "descriptionsOtherActivities";
    pub const ADVISOR_NAME: &str = "advisorName";

    /// Scalar text fields, in form order
    pub const TEXT_FIELDS: &[&str] = &[
        FIRST_NAME,
        LAST_NAME,
        N_NUMBER,
        BOX_NUMBER,
        SEMESTER,
        CONTRACT_YEAR,
        STUDY_LOCATION,
        EXPECTED_GRAD_YEAR,
        GOALS,
        CERTIFICATION_CRITERIA,
        DESCRIPTIONS_OTHER_ACTIVITIES,
        ADVISOR_NAME,
    ];
}

/// Default study location for new contracts
pub const DEFAULT_STUDY_LOCATION: &str = "On Campus";

/// The classes table shows 4 to 9 rows
pub const CLASSES_SIZER: ListSizer = ListSizer::new(4, 9);

/// One row of the classes table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassEntry {
    pub course_code: String,
    pub course_name: String,
    pub is_internship: bool,
    pub instructor_name: String,
    pub session_name: String,
}

impl ClassEntry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Any of code, name, internship or instructor set. Session alone does
    /// not count; it is a dropdown with a default choice.
    pub fn is_non_empty(&self) -> bool {
        !self.course_code.is_empty()
            || !self.course_name.is_empty()
            || self.is_internship
            || !self.instructor_name.is_empty()
    }
}

impl FromValue for ClassEntry {
    fn from_value(value: &Value) -> Self {
        Self {
            course_code: String::from_value(value.field("courseCode")),
            course_name: String::from_value(value.field("courseName")),
            is_internship: bool::from_value(value.field("isInternship")),
            instructor_name: String::from_value(value.field("instructorName")),
            session_name: String::from_value(value.field("sessionName")),
        }
    }
}

impl IntoValue for ClassEntry {
    fn into_value(self) -> Value {
        Value::record([
            ("courseCode", Value::text(self.course_code)),
            ("courseName", Value::text(self.course_name)),
            ("isInternship", Value::Bool(self.is_internship)),
            ("instructorName", Value::text(self.instructor_name)),
            ("sessionName", Value::text(self.session_name)),
        ])
    }
}

/// Apply [`CLASSES_SIZER`] to raw class rows.
pub fn resize_classes(rows: Vec<Value>) -> Vec<Value> {
    CLASSES_SIZER.resize(
        rows,
        |row| ClassEntry::from_value(row).is_non_empty(),
        || ClassEntry::empty().into_value(),
    )
}

/// Decoded class rows; a missing or malformed list reads as no rows.
pub fn class_entries(body: &Value) -> Vec<ClassEntry> {
    body.field(fields::CLASSES)
        .as_list()
        .map(|rows| rows.iter().map(ClassEntry::from_value).collect())
        .unwrap_or_default()
}

/// Body for a freshly created contract.
pub fn template_body() -> Value {
    let mut entries: Vec<(&str, Value)> = fields::TEXT_FIELDS
        .iter()
        .map(|name| (*name, Value::from("")))
        .collect();
    entries.push((fields::STUDY_LOCATION, Value::from(DEFAULT_STUDY_LOCATION)));
    entries.push((fields::CLASSES, Value::list(resize_classes(Vec::new()))));
    Value::record(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_entry_defaults_missing_fields() {
        let raw = Value::record([("courseName", Value::from("Logic"))]);
        let entry = ClassEntry::from_value(&raw);
        assert_eq!(entry.course_name, "Logic");
        assert_eq!(entry.course_code, "");
        assert!(!entry.is_internship);
    }

    #[test]
    fn test_session_alone_is_empty() {
        let entry = ClassEntry {
            session_name: "M1".to_string(),
            ..ClassEntry::empty()
        };
        assert!(!entry.is_non_empty());
    }

    #[test]
    fn test_internship_flag_is_non_empty() {
        let entry = ClassEntry {
            is_internship: true,
            ..ClassEntry::empty()
        };
        assert!(entry.is_non_empty());
    }

    #[test]
    fn test_template_body() {
        let body = template_body();
        assert_eq!(body.field(fields::STUDY_LOCATION).as_str(), Some("On Campus"));
        assert_eq!(body.field(fields::FIRST_NAME).as_str(), Some(""));
        assert_eq!(class_entries(&body), vec![ClassEntry::empty(); 4]);
    }

    #[test]
    fn test_malformed_classes_read_as_none() {
        let body = Value::record([(fields::CLASSES, Value::from("oops"))]);
        assert!(class_entries(&body).is_empty());
    }

    #[test]
    fn test_serde_matches_value_encoding() {
        let entry = ClassEntry {
            course_code: "101".to_string(),
            is_internship: true,
            ..ClassEntry::empty()
        };
        let via_serde: Value = serde_json::from_value(serde_json::to_value(&entry).unwrap()).unwrap();
        assert_eq!(via_serde, entry.into_value());
    }
}
