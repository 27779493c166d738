//! Headless front end: page model, renderer and event dispatcher.

pub mod debounce;
pub mod dispatch;
pub mod events;
pub mod html;
pub mod page;
pub mod render;
pub mod state;

pub use debounce::Debouncer;
pub use dispatch::{Dispatcher, Services};
pub use events::{Action, EventKind, Feature, Mood, UiEvent};
pub use html::{escape, Binding, Fragment};
pub use page::{Page, Target};
pub use state::AppState;
