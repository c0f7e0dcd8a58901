//! Console front end: prompts and tables.

pub mod input;
pub mod prompt;
pub mod render;

pub use input::{stdin_lines, ChannelLines, LineSource};
pub use prompt::ConsolePlayer;
pub use render::{render_grid, render_probability_table, render_summary};
