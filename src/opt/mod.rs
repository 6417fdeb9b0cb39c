pub mod aco;
pub mod baseline;
pub mod construct;
pub mod eval;
pub mod pheromone;
