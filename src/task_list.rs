use crate::error::{Error, Result};
use crate::task::Task;

/// Key used to reorder the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Ascending, compared as plain text.
    DueDate,
    /// Highest priority first.
    Priority,
}

impl SortKey {
    pub fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(SortKey::DueDate),
            2 => Some(SortKey::Priority),
            _ => None,
        }
    }
}

/// Tasks for the current session, in display order. Positions handed to
/// and from callers are 1-based.
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn add(&mut self, task: Task) {
        if !task.has_calendar_due_date() {
            tracing::debug!(due_date = %task.due_date, "due date is not YYYY-MM-DD, keeping as typed");
        }
        self.tasks.push(task);
        tracing::debug!(count = self.tasks.len(), "task added");
    }

    pub fn get(&self, index: i64) -> Result<&Task> {
        let pos = self.position(index)?;
        Ok(&self.tasks[pos])
    }

    pub fn remove(&mut self, index: i64) -> Result<Task> {
        let pos = self.position(index)?;
        let task = self.tasks.remove(pos);
        tracing::debug!(index, count = self.tasks.len(), "task removed");
        Ok(task)
    }

    /// Marks the task completed. Completing twice is a no-op.
    pub fn complete(&mut self, index: i64) -> Result<&Task> {
        let pos = self.position(index)?;
        self.tasks[pos].completed = true;
        tracing::debug!(index, "task completed");
        Ok(&self.tasks[pos])
    }

    /// Stable sort, so equal keys keep their current order.
    pub fn sort_by(&mut self, key: SortKey) {
        match key {
            SortKey::DueDate => self.tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date)),
            SortKey::Priority => self.tasks.sort_by(|a, b| b.priority.cmp(&a.priority)),
        }
        tracing::debug!(?key, count = self.tasks.len(), "tasks sorted");
    }

    /// Tasks whose description contains `term`, case-sensitive, in list
    /// order. An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Task> {
        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.description.contains(term))
            .collect();
        tracing::debug!(term, matches = matches.len(), "search");
        matches
    }

    fn position(&self, index: i64) -> Result<usize> {
        if index < 1 || index > self.tasks.len() as i64 {
            return Err(Error::InvalidIndex(index));
        }
        Ok(index as usize - 1)
    }
}
