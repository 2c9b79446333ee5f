pub mod access;
pub mod admin;
pub mod profile;
pub mod resolve;
