mod destroyable;
pub mod error;
pub mod events;
pub mod game;
pub mod model;
pub mod platform;

pub use destroyable::Destroyable;
