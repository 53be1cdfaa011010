pub mod auth;
pub mod courses;
pub mod departments;
pub mod governing;
pub mod members;
pub mod representatives;
pub mod staff;
