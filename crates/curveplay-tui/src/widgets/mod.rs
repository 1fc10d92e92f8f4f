mod draw_list;
mod status_bar;

pub use draw_list::DrawListPainter;
pub use status_bar::StatusBarWidget;
