use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::nav::{Dependency, NavError, Scene, ScreenId};
use crate::ui::theme::Theme;

/// A screen the coordinator can stack, overlay and draw.
pub trait Screen {
    fn dependency(&self) -> &Dependency;

    fn title(&self) -> String;

    /// Navigation requests made here are queued and run after the key
    /// has been handled.
    fn handle_key(&mut self, key: KeyEvent) -> Result<(), NavError>;

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme);

    fn hints(&self) -> Vec<String> {
        Vec::new()
    }

    /// True while typed characters belong to a text field.
    fn captures_text(&self) -> bool {
        false
    }

    /// Called when the screen becomes visible again after a pop or dismiss.
    fn on_appear(&mut self) {}

    fn scene(&self) -> Scene {
        self.dependency().scene
    }

    fn id(&self) -> ScreenId {
        self.dependency().screen_id
    }
}
