pub mod repository;
pub mod service;

pub use repository::{MongoUnitMeasureRepository, UnitMeasureRepository};
pub use service::{UnitMeasureInput, UnitMeasureResponse, UnitMeasureService};
