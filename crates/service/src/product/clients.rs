//! Outbound lookup clients for the services that own the entities a product
//! may reference. Each client issues one synchronous GET against the owning
//! service's query endpoint and reports the raw upstream status and body;
//! interpreting the status is the caller's concern.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::errors::ServiceError;

/// Raw outcome of an existence lookup.
#[derive(Clone, Debug)]
pub struct LookupResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait UnitMeasureLookup: Send + Sync {
    async fn query_by_id(&self, id: &str) -> Result<LookupResponse, ServiceError>;
}

#[async_trait]
pub trait DepartmentLookup: Send + Sync {
    async fn query_by_id(&self, id: &str) -> Result<LookupResponse, ServiceError>;
}

/// reqwest-backed client for the unit measure service.
pub struct HttpUnitMeasureClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpUnitMeasureClient {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl UnitMeasureLookup for HttpUnitMeasureClient {
    async fn query_by_id(&self, id: &str) -> Result<LookupResponse, ServiceError> {
        let url = format!("{}?id={}", self.base_url, id);
        debug!(layer = "client", dependency = "unit_measure", %url, "query_by_id");
        fetch(&self.http, &url).await
    }
}

/// reqwest-backed client for the department service.
pub struct HttpDepartmentClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDepartmentClient {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl DepartmentLookup for HttpDepartmentClient {
    async fn query_by_id(&self, id: &str) -> Result<LookupResponse, ServiceError> {
        let url = format!("{}?id={}", self.base_url, id);
        debug!(layer = "client", dependency = "department", %url, "query_by_id");
        fetch(&self.http, &url).await
    }
}

/// A transport failure (connect error, timeout) is `Unavailable`; any HTTP
/// answer, success or not, comes back as a `LookupResponse`.
async fn fetch(http: &reqwest::Client, url: &str) -> Result<LookupResponse, ServiceError> {
    let resp = http
        .get(url)
        .send()
        .await
        .map_err(|e| ServiceError::Unavailable(e.to_string()))?;
    let status = resp.status().as_u16();
    let body = resp
        .text()
        .await
        .map_err(|e| ServiceError::Unavailable(e.to_string()))?;
    Ok(LookupResponse { status, body })
}
