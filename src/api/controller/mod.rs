pub mod deployment;
pub mod system;
