pub mod clients;
pub mod repository;
pub mod service;

pub use clients::{
    DepartmentLookup, HttpDepartmentClient, HttpUnitMeasureClient, LookupResponse, UnitMeasureLookup,
};
pub use repository::{MongoProductRepository, ProductRepository};
pub use service::{ProductInput, ProductResponse, ProductService};
