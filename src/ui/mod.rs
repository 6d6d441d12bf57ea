//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: event loop, key bindings per tab, layout
//! - **[`panes`]**: stateless render functions for each visible pane
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point is [`App`]: construct it with a [`Dashboard`] and call
//! [`App::run`] to start the event loop.
//!
//! [`Dashboard`]: crate::dashboard::Dashboard
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
