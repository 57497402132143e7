//! Topic tree view
//!
//! State, transitions and rendering for the accordion. The controller
//! owns a repository and issues the single fetch; everything else here is
//! synchronous.

pub mod controller;
pub mod key;
pub mod render;
pub mod state;
pub mod toolkit;

pub use controller::{MountOutcome, TopicView};
pub use key::FormulaKey;
pub use render::{Line, Target, render, render_lines};
pub use state::{OpenFormulas, Phase, Settled, ViewState};
pub use toolkit::{Icon, TerminalToolkit, Tone, Toolkit};
