use chrono::NaiveDate;
use std::fmt;

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub due_date: String, // YYYY-MM-DD, kept as typed
    pub priority: i64,
    pub completed: bool,
}

impl Task {
    pub fn new(description: String, due_date: String, priority: i64) -> Self {
        Self {
            description,
            due_date,
            priority,
            completed: false,
        }
    }

    /// Whether the due date reads as a calendar date. Informational only.
    pub fn has_calendar_due_date(&self) -> bool {
        NaiveDate::parse_from_str(&self.due_date, DUE_DATE_FORMAT).is_ok()
    }

    fn marker(&self) -> char {
        if self.completed {
            'X'
        } else {
            ' '
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} (Priority {})",
            self.marker(),
            self.description,
            self.priority
        )
    }
}
