pub mod dns;
pub mod geo;
