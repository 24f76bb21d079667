pub mod accumulator;
pub mod aggregate;
pub mod demand;
