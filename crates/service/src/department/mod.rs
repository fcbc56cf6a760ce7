pub mod repository;
pub mod service;

pub use repository::{DepartmentRepository, MongoDepartmentRepository};
pub use service::{DepartmentInput, DepartmentResponse, DepartmentService};
