//! Console front end: the numbered menu and the text renderers it shares
//! with the one-shot commands.

pub mod menu;
pub mod render;

pub use menu::{Menu, MenuChoice};
pub use render::Palette;
