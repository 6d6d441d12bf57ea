//! TUI pane rendering modules
//!
//! Every pane is a stateless `render_*` function over borrowed dashboard
//! state; scroll offsets that must survive between frames are passed in by
//! `&mut`.
//!
//! # Pane Modules
//!
//! - [`header`]: product line and the F1-F4 tab bar
//! - [`editor`]: editable source with syntax highlighting and fault marking
//! - [`output`]: lines or failure text of the latest run
//! - [`analysis`]: the simulated code review
//! - [`tutorials`]: catalog list and tutorial detail
//! - [`exercises`]: current exercise, hints, solution and stats
//! - [`status`]: status bar with keybindings and activity indicators
//! - `utils`: blocks, badges and progress bars shared by the content panes

mod utils;

pub mod analysis;
pub mod editor;
pub mod exercises;
pub mod header;
pub mod output;
pub mod status;
pub mod tutorials;

// Re-export render functions for convenience
pub use analysis::render_analysis_pane;
pub use editor::render_editor_pane;
pub use exercises::render_exercises_pane;
pub use header::render_header;
pub use output::render_output_pane;
pub use status::render_status_bar;
pub use tutorials::render_tutorials_pane;
