//! User actions, their outcomes and the view rendered after each one.

pub mod interaction_loop;
pub mod services;
pub mod view;

pub use interaction_loop::InteractionLoop;
pub use services::Services;
pub use view::SessionView;
