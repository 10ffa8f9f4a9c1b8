pub mod department_heads;
pub mod parents;
pub mod students;
pub mod uploads;
pub mod users;

pub use self::students::model::Student;
pub use self::users::model::User;
