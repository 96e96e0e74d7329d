pub mod geo_report_service;
