pub mod cpu;
pub mod driver;
pub mod scheduler;
pub mod surface;
