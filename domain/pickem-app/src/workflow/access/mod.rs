pub mod gate;
pub mod request;
