pub mod admin_service;
pub mod auth_service;
pub mod course_service;
pub mod department_service;
pub mod governing_body_service;
pub mod staff_service;

pub use admin_service::AdminService;
pub use auth_service::AuthService;
pub use course_service::CourseService;
pub use department_service::DepartmentService;
pub use governing_body_service::GoverningBodyService;
pub use staff_service::{PhotoUpload, StaffService};
