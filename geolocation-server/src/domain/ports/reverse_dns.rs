use std::future::Future;
use std::net::IpAddr;

use crate::domain::errors::AppError;

pub trait ReverseDns: Send + Sync + 'static {
    fn reverse_lookup(&self, ip: IpAddr) -> impl Future<Output = Result<String, AppError>> + Send;
}
