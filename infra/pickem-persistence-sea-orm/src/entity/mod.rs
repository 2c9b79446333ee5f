pub mod access_request;
pub mod account;
pub mod group;
pub mod membership;
pub mod profile;
