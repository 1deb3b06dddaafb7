use crate::form::{FieldValue, FormState};
use crate::framework::MultipartForm;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Type-safe identifier for Todos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Urgency of a todo. Sent lower-case; values the client does not know are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Extreme,
    Moderate,
    Low,
    /// No priority picked.
    #[default]
    Unset,
    Other(String),
}

impl Priority {
    /// The priorities offered when editing.
    pub const CHOICES: [Priority; 3] = [Priority::Extreme, Priority::Moderate, Priority::Low];

    pub fn as_str(&self) -> &str {
        match self {
            Priority::Extreme => "extreme",
            Priority::Moderate => "moderate",
            Priority::Low => "low",
            Priority::Unset => "",
            Priority::Other(other) => other,
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "extreme" => Priority::Extreme,
            "moderate" => Priority::Moderate,
            "low" => Priority::Low,
            "" => Priority::Unset,
            _ => Priority::Other(value),
        }
    }
}

impl From<&str> for Priority {
    fn from(value: &str) -> Self {
        Priority::from(value.to_string())
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        value.as_str().to_string()
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A todo as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub todo_date: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Todo {
    /// The due date, if set and well-formed.
    pub fn due_date(&self) -> Option<NaiveDate> {
        let raw = self.todo_date.as_deref()?;
        // Some servers send a full timestamp; the date part is what matters.
        let date = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }

    /// "Mar 1, 2024", the way due dates are shown in listings.
    pub fn due_label(&self) -> Option<String> {
        self.due_date().map(|date| date.format("%b %-d, %Y").to_string())
    }
}

/// The list envelope returned by `GET /todos/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoPage {
    #[serde(default)]
    pub results: Vec<Todo>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Body of a create or update. Sent as multipart text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub description: String,
    pub todo_date: String,
    pub priority: Priority,
}

impl TodoDraft {
    /// Starts an edit from an existing todo.
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone(),
            todo_date: todo.todo_date.clone().unwrap_or_default(),
            priority: todo.priority.clone(),
        }
    }

    /// Reads the four todo fields out of an edit form.
    pub fn from_form(form: &FormState) -> Self {
        Self {
            title: form.text("title").to_string(),
            description: form.text("description").to_string(),
            todo_date: form.text("todo_date").to_string(),
            priority: Priority::from(form.text("priority")),
        }
    }

    pub fn to_form_state(&self) -> FormState {
        FormState::from_pairs([
            ("title", FieldValue::from(self.title.as_str())),
            ("description", FieldValue::from(self.description.as_str())),
            ("todo_date", FieldValue::from(self.todo_date.as_str())),
            ("priority", FieldValue::from(self.priority.as_str())),
        ])
    }

    pub fn to_multipart(&self) -> MultipartForm {
        MultipartForm::new()
            .text("title", &self.title)
            .text("description", &self.description)
            .text("todo_date", &self.todo_date)
            .text("priority", self.priority.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Todo {
        serde_json::from_value(json!({
            "id": 7,
            "title": "Write report",
            "description": "Quarterly numbers",
            "priority": "Extreme",
            "is_completed": false,
            "position": 1,
            "todo_date": "2024-03-01",
            "created_at": "2024-02-20T10:00:00Z",
            "updated_at": "2024-02-21T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_todo_decodes() {
        let todo = sample();
        assert_eq!(todo.id, TodoId(7));
        assert_eq!(todo.priority, Priority::Extreme);
        assert_eq!(todo.due_date(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(todo.due_label().as_deref(), Some("Mar 1, 2024"));
    }

    #[test]
    fn test_unknown_priority_is_preserved() {
        let priority: Priority = serde_json::from_value(json!("urgent")).unwrap();
        assert_eq!(priority, Priority::Other("urgent".into()));
        assert_eq!(serde_json::to_value(&priority).unwrap(), json!("urgent"));
        assert_eq!(serde_json::to_value(Priority::Low).unwrap(), json!("low"));
    }

    #[test]
    fn test_null_date_and_missing_fields() {
        let todo: Todo = serde_json::from_value(json!({
            "id": 1,
            "title": "Bare",
            "todo_date": null
        }))
        .unwrap();
        assert_eq!(todo.due_date(), None);
        assert_eq!(todo.priority, Priority::Unset);
    }

    #[test]
    fn test_draft_roundtrips_through_form() {
        let draft = TodoDraft::from_todo(&sample());
        let mut form = draft.to_form_state();
        form.set_field("priority", "low");

        let edited = TodoDraft::from_form(&form);
        assert_eq!(edited.title, "Write report");
        assert_eq!(edited.priority, Priority::Low);

        let multipart = edited.to_multipart();
        assert_eq!(multipart.get_text("priority"), Some("low"));
        assert_eq!(multipart.get_text("todo_date"), Some("2024-03-01"));
    }

    #[test]
    fn test_todo_id_parses() {
        assert_eq!(" 42 ".parse::<TodoId>().unwrap(), TodoId(42));
        assert!("abc".parse::<TodoId>().is_err());
        assert_eq!(TodoId(9).to_string(), "9");
    }
}
