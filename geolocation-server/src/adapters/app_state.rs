use std::sync::Arc;

use crate::{
    application::services::geo_report_service::GeoReportService,
    domain::ports::{geo_database::GeoDatabase, reverse_dns::ReverseDns},
};

pub struct AppState<D: ReverseDns, G: GeoDatabase> {
    pub report_service: Arc<GeoReportService<D, G>>,
}

impl<D: ReverseDns, G: GeoDatabase> AppState<D, G> {
    pub fn new(report_service: GeoReportService<D, G>) -> Self {
        Self {
            report_service: Arc::new(report_service),
        }
    }
}

// Derived `Clone` would require `D: Clone` and `G: Clone`.
impl<D: ReverseDns, G: GeoDatabase> Clone for AppState<D, G> {
    fn clone(&self) -> Self {
        Self {
            report_service: Arc::clone(&self.report_service),
        }
    }
}
