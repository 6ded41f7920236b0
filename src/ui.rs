use crate::config::Settings;
use crate::error::{Error, Result};
use crate::task::Task;
use crate::task_list::{SortKey, TaskList};
use crossterm::style::Stylize;
use std::io::{BufRead, Write};

const MENU: [&str; 7] = [
    "1. Add Task",
    "2. List Tasks",
    "3. Complete Task",
    "4. Delete Task",
    "5. Sort Tasks",
    "6. Search Tasks",
    "0. Exit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    List,
    Complete,
    Delete,
    Sort,
    Search,
    Exit,
}

impl Command {
    pub fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(Command::Add),
            2 => Some(Command::List),
            3 => Some(Command::Complete),
            4 => Some(Command::Delete),
            5 => Some(Command::Sort),
            6 => Some(Command::Search),
            0 => Some(Command::Exit),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Optional terminal styling. Leaves the text itself untouched.
#[derive(Debug, Clone, Copy)]
struct Palette {
    enabled: bool,
}

impl Palette {
    fn heading(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn success(&self, text: &str) -> String {
        if self.enabled {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.enabled {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Menu-driven session over any line reader and writer. Owns the task list
/// for its whole lifetime.
pub struct Session<R, W> {
    input: R,
    output: W,
    tasks: TaskList,
    palette: Palette,
    banner: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, settings: &Settings) -> Self {
        Self {
            input,
            output,
            tasks: TaskList::new(),
            palette: Palette {
                enabled: settings.color,
            },
            banner: settings.banner,
        }
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user exits or input runs out.
    pub fn run(&mut self) -> Result<()> {
        if self.banner {
            let title = self.palette.heading("Welcome to your To-Do List!");
            writeln!(self.output, "{title}")?;
            writeln!(self.output, "=============================")?;
        }

        loop {
            match self.step() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(Error::EndOfInput) => {
                    tracing::debug!("input closed, ending session");
                    writeln!(self.output)?;
                    break;
                }
                Err(err) if err.is_recoverable() => {
                    tracing::debug!(error = %err, "recoverable input error");
                    self.report(&err)?;
                }
                Err(err) => return Err(err),
            }
        }

        writeln!(self.output, "Thank you for using your To-Do List!")?;
        self.output.flush()?;
        Ok(())
    }

    fn step(&mut self) -> Result<Flow> {
        self.print_menu()?;
        let choice = self.prompt_number("Choose an option (0-6): ")?;
        let command = Command::from_choice(choice).ok_or(Error::InvalidChoice(choice))?;
        tracing::trace!(?command, "dispatch");

        match command {
            Command::Add => self.add_task()?,
            Command::List => self.list_tasks()?,
            Command::Complete => self.complete_task()?,
            Command::Delete => self.delete_task()?,
            Command::Sort => self.sort_tasks()?,
            Command::Search => self.search_tasks()?,
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output)?;
        for line in MENU {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    fn add_task(&mut self) -> Result<()> {
        let description = self.prompt("Enter task description: ")?;
        let due_date = self.prompt("Enter task due date (YYYY-MM-DD): ")?;
        let priority = self.prompt_number("Enter task priority (1-5): ")?;

        self.tasks.add(Task::new(description, due_date, priority));
        self.confirm("Task added successfully.")
    }

    fn list_tasks(&mut self) -> Result<()> {
        writeln!(self.output, "Tasks:")?;
        for (i, task) in self.tasks.tasks().iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, task)?;
        }
        Ok(())
    }

    fn complete_task(&mut self) -> Result<()> {
        let index = self.prompt_number("Enter task number to mark as completed: ")?;
        let task = self.tasks.complete(index)?;
        let message = format!("Task '{}' marked as completed.", task.description);
        self.confirm(&message)
    }

    fn delete_task(&mut self) -> Result<()> {
        let index = self.prompt_number("Enter task number to delete: ")?;
        let task = self.tasks.remove(index)?;
        let message = format!("Task '{}' deleted.", task.description);
        self.confirm(&message)
    }

    fn sort_tasks(&mut self) -> Result<()> {
        writeln!(self.output, "Sort by:")?;
        writeln!(self.output, "1. Due date")?;
        writeln!(self.output, "2. Priority")?;
        let choice = self.prompt_number("Choose an option (1-2): ")?;
        let key = SortKey::from_choice(choice).ok_or(Error::InvalidChoice(choice))?;

        self.tasks.sort_by(key);
        match key {
            SortKey::DueDate => self.confirm("Tasks sorted by due date."),
            SortKey::Priority => self.confirm("Tasks sorted by priority."),
        }
    }

    fn search_tasks(&mut self) -> Result<()> {
        let term = self.prompt("Enter search term: ")?;
        let matches = self.tasks.search(&term);
        for task in &matches {
            writeln!(self.output, "{task}")?;
        }

        if matches.is_empty() {
            writeln!(self.output, "No matching tasks found.")?;
        } else {
            writeln!(self.output, "{} matching tasks found.", matches.len())?;
        }
        Ok(())
    }

    fn confirm(&mut self, message: &str) -> Result<()> {
        let line = self.palette.success(message);
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    fn report(&mut self, err: &Error) -> Result<()> {
        let line = self.palette.error(&err.to_string());
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Prints `message`, then reads one line without its line terminator.
    /// Bytes that are not UTF-8 become U+FFFD rather than an error.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Err(Error::EndOfInput);
        }
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn prompt_number(&mut self, message: &str) -> Result<i64> {
        let line = self.prompt(message)?;
        let trimmed = line.trim();
        trimmed
            .parse()
            .map_err(|_| Error::NotANumber(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Settings {
        Settings {
            color: false,
            banner: true,
        }
    }

    fn run(input: &str) -> (String, Vec<Task>) {
        let mut session = Session::new(input.as_bytes(), Vec::new(), &plain());
        session.run().unwrap();
        let tasks = session.tasks().tasks().to_vec();
        let output = String::from_utf8(session.into_output()).unwrap();
        (output, tasks)
    }

    fn descriptions(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.description.as_str()).collect()
    }

    const TWO_TASKS: &str = "1\nTask A\n2024-01-10\n3\n1\nTask B\n2024-01-05\n5\n";

    #[test]
    fn exit_prints_banner_menu_and_farewell() {
        let (output, tasks) = run("0\n");
        assert!(output.starts_with("Welcome to your To-Do List!\n=============================\n"));
        for line in MENU {
            assert!(output.contains(line));
        }
        assert!(output.contains("Choose an option (0-6): "));
        assert!(output.ends_with("Thank you for using your To-Do List!\n"));
        assert!(tasks.is_empty());
    }

    #[test]
    fn banner_can_be_turned_off() {
        let settings = Settings {
            color: false,
            banner: false,
        };
        let mut session = Session::new("0\n".as_bytes(), Vec::new(), &settings);
        session.run().unwrap();
        let output = String::from_utf8(session.into_output()).unwrap();
        assert!(!output.contains("Welcome"));
        assert!(output.starts_with("\n1. Add Task\n"));
    }

    #[test]
    fn add_then_list() {
        let (output, tasks) = run(&format!("{TWO_TASKS}3\n1\n2\n0\n"));
        assert_eq!(output.matches("Task added successfully.").count(), 2);
        assert!(output.contains("Tasks:\n1. [X] Task A (Priority 3)\n2. [ ] Task B (Priority 5)\n"));
        assert_eq!(descriptions(&tasks), ["Task A", "Task B"]);
        assert_eq!(tasks[1].due_date, "2024-01-05");
    }

    #[test]
    fn list_on_empty_store_prints_header_only() {
        let (output, _) = run("2\n0\n");
        assert!(output.contains("Tasks:\n\n1. Add Task"));
    }

    #[test]
    fn complete_names_the_task() {
        let (output, tasks) = run(&format!("{TWO_TASKS}3\n2\n3\n2\n0\n"));
        assert_eq!(output.matches("Task 'Task B' marked as completed.").count(), 2);
        assert!(!tasks[0].completed);
        assert!(tasks[1].completed);
    }

    #[test]
    fn delete_names_the_removed_task() {
        let (output, tasks) = run(&format!("{TWO_TASKS}4\n1\n0\n"));
        assert!(output.contains("Task 'Task A' deleted."));
        assert_eq!(descriptions(&tasks), ["Task B"]);
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let (output, tasks) = run(&format!("{TWO_TASKS}3\n0\n4\n3\n3\n-1\n0\n"));
        assert_eq!(output.matches("Invalid task number, please try again.").count(), 3);
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| !t.completed));
    }

    #[test]
    fn sort_by_both_keys() {
        let (output, tasks) = run(&format!("{TWO_TASKS}5\n2\n0\n"));
        assert!(output.contains("Sort by:\n1. Due date\n2. Priority\nChoose an option (1-2): "));
        assert!(output.contains("Tasks sorted by priority."));
        assert_eq!(descriptions(&tasks), ["Task B", "Task A"]);

        let (output, tasks) = run(&format!("{TWO_TASKS}5\n1\n0\n"));
        assert!(output.contains("Tasks sorted by due date."));
        assert_eq!(descriptions(&tasks), ["Task B", "Task A"]);
    }

    #[test]
    fn invalid_sort_choice_leaves_order() {
        let (output, tasks) = run(&format!("{TWO_TASKS}5\n7\n0\n"));
        assert!(output.contains("Invalid choice, please try again."));
        assert!(!output.contains("Tasks sorted"));
        assert_eq!(descriptions(&tasks), ["Task A", "Task B"]);
    }

    #[test]
    fn search_prints_matches_and_count() {
        let (output, _) = run(&format!("{TWO_TASKS}6\nTask\n6\nB\n6\nnothing\n0\n"));
        assert!(output.contains(
            "Enter search term: [ ] Task A (Priority 3)\n[ ] Task B (Priority 5)\n2 matching tasks found.\n"
        ));
        assert!(output.contains("Enter search term: [ ] Task B (Priority 5)\n1 matching tasks found.\n"));
        assert!(output.contains("Enter search term: No matching tasks found.\n"));
    }

    #[test]
    fn unknown_menu_choice_redisplays_menu() {
        let (output, _) = run("9\n0\n");
        assert!(output.contains("Invalid choice, please try again.\n\n1. Add Task"));
    }

    #[test]
    fn non_numeric_input_returns_to_menu() {
        let (output, tasks) = run("abc\n1\nTask A\n2024-01-10\nhigh\n3\nx\n0\n");
        assert!(output.contains("'abc' is not a number, please try again."));
        assert!(output.contains("'high' is not a number, please try again."));
        assert!(output.contains("'x' is not a number, please try again."));
        assert!(!output.contains("Task added successfully."));
        assert!(tasks.is_empty());
        assert!(output.ends_with("Thank you for using your To-Do List!\n"));
    }

    #[test]
    fn numbers_tolerate_surrounding_whitespace() {
        let (output, tasks) = run("1\n  spaced  \n2024-01-10\n 4 \n 0\n");
        assert!(output.contains("Task added successfully."));
        assert_eq!(tasks[0].description, "  spaced  ");
        assert_eq!(tasks[0].priority, 4);
    }

    #[test]
    fn windows_line_endings_are_stripped() {
        let (_, tasks) = run("1\r\nTask A\r\n2024-01-10\r\n3\r\n0\r\n");
        assert_eq!(tasks[0].description, "Task A");
        assert_eq!(tasks[0].due_date, "2024-01-10");
    }

    #[test]
    fn end_of_input_ends_session_cleanly() {
        let (output, tasks) = run("1\nTask A\n");
        assert!(output.ends_with("Thank you for using your To-Do List!\n"));
        assert!(tasks.is_empty());

        let (output, _) = run("");
        assert!(output.ends_with("Thank you for using your To-Do List!\n"));
    }

    #[test]
    fn invalid_utf8_is_not_fatal() {
        let mut session = Session::new(&b"\xff\n0\n"[..], Vec::new(), &plain());
        assert!(session.run().is_ok());
        let output = String::from_utf8(session.into_output()).unwrap();
        assert!(output.contains("'\u{fffd}' is not a number, please try again."));
        assert!(output.ends_with("Thank you for using your To-Do List!\n"));
    }

    #[test]
    fn invalid_utf8_text_is_stored_lossily() {
        let input = b"\xff\xfe\n1\nTask \xffA\n2024-01-10\n3\n0\n";
        let mut session = Session::new(&input[..], Vec::new(), &plain());
        session.run().unwrap();
        let tasks = session.tasks().tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "Task \u{fffd}A");
        assert_eq!(tasks[0].priority, 3);
    }

    #[test]
    fn colored_output_keeps_text() {
        let settings = Settings {
            color: true,
            banner: true,
        };
        let input = format!("{TWO_TASKS}9\n0\n");
        let mut session = Session::new(input.as_bytes(), Vec::new(), &settings);
        session.run().unwrap();
        let output = String::from_utf8(session.into_output()).unwrap();
        assert!(output.contains("\u{1b}["));
        assert!(output.contains("Task added successfully."));
        assert!(output.contains("Invalid choice, please try again."));
    }

    #[test]
    fn command_choices() {
        assert_eq!(Command::from_choice(0), Some(Command::Exit));
        assert_eq!(Command::from_choice(1), Some(Command::Add));
        assert_eq!(Command::from_choice(6), Some(Command::Search));
        assert_eq!(Command::from_choice(7), None);
        assert_eq!(Command::from_choice(8), None);
        assert_eq!(Command::from_choice(-1), None);
    }
}
