pub mod events;
pub mod photos;
pub mod system;
