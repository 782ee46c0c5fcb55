//! Type-safe wrappers shared by the config, engine and backend layers

mod geometry;

pub use geometry::{Dimensions, Monitor, Position, Rect};
