pub mod app_state;
pub mod client_ip;
pub mod geo_location;
pub mod http;
