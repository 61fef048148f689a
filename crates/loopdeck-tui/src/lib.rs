pub mod app;
pub mod event;
pub mod host;
pub mod input;
pub mod scroll;
pub mod strip;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use host::StripHost;
pub use strip::Strip;
pub use theme::Theme;
