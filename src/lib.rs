//! Trailview library exports for testing

pub mod access;
pub mod core;
pub mod map;
pub mod osm;
pub mod tui;

#[cfg(test)]
pub mod test_support;
