pub mod change;
pub mod item;
pub mod ports;
