pub mod aggregate;
pub mod budget;
pub mod elapsed;
