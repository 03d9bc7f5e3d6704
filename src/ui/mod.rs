pub mod layout;
pub mod line_input;
pub mod screen;
pub mod screens;
pub mod theme;
