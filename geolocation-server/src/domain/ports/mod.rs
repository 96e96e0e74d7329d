pub mod geo_database;
pub mod reverse_dns;
