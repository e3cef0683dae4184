pub mod accumulator;
pub mod panel;
pub mod tips;
