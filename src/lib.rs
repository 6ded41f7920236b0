//! In-memory to-do list driven by a numbered console menu.

pub mod config;
pub mod error;
pub mod task;
pub mod task_list;
pub mod ui;
