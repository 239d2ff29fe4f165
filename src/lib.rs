pub mod driver;
pub mod gfa;
pub mod linesearch;
pub mod minimize;
pub mod objective;
pub mod poly;
pub mod progress;
pub mod render;
