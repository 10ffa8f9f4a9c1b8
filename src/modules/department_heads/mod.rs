pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::DepartmentHead;
pub use router::init_department_heads_router;
