//! GeoClash - Location-Based Capture Battles

pub mod api;
pub mod arena;
pub mod battle;
pub mod core;
pub mod geofence;
pub mod resolution;
pub mod storage;
