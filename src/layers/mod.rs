pub mod error;
pub mod loader;
pub mod road_network;
