#[allow(clippy::module_inception)]
pub mod app;
pub mod input;
pub mod renderer;

pub use app::App;
pub use input::Input;
pub use renderer::{Renderer, TerminalRenderer};
