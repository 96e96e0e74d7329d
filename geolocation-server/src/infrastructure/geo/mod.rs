pub mod maxmind_database;
