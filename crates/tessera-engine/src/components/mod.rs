//! Built-in components.
//!
//! - [`Script`]: closure-driven behavior, for glue code and tests.
//! - [`ShapeRenderer`]: filled rectangle or circle.
//! - [`TextLabel`]: a line of text, drawn in the overlay queue by default.
//! - [`Trigger`]: pointer hit-area that raises enter/exit/hover/click events.

mod script;
mod shape;
mod text;
mod trigger;

pub use script::{Script, ScriptFn};
pub use shape::{Shape, ShapeRenderer};
pub use text::TextLabel;
pub use trigger::{Trigger, TriggerEvent, TriggerListener};
