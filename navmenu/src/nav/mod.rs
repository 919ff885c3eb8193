//! Navigation menu component

pub mod flags;
pub mod icon;
pub mod menu;
pub mod shortcuts;
