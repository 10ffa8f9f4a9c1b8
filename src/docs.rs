use utoipa::OpenApi;

use crate::modules::department_heads::model::{
    CreateDepartmentHeadDto, DepartmentHead, DepartmentHeadDetails,
    PaginatedDepartmentHeadsResponse,
};
use crate::modules::parents::model::{
    CreateParentDto, PaginatedParentsResponse, Parent, ParentDetails, Relationship,
    UpdateParentDto,
};
use crate::modules::students::model::{
    CreateStudentDto, Level, PaginatedStudentsResponse, Student, StudentDetails, UpdateStudentDto,
};
use crate::modules::uploads::model::{
    ListKind, PaginatedUploadsResponse, UploadRecord, UploadRecordResponse,
};
use crate::modules::users::controller::ErrorResponse;
use crate::modules::users::model::{
    CreateUserDto, PaginatedUsersResponse, UpdateProfileDto, User, UserResponse, UserRole,
};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::upload_picture,
        crate::modules::users::controller::reset_picture,
        crate::modules::users::controller::delete_user,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::parents::controller::create_parent,
        crate::modules::parents::controller::get_parents,
        crate::modules::parents::controller::get_parent,
        crate::modules::parents::controller::update_parent,
        crate::modules::parents::controller::delete_parent,
        crate::modules::department_heads::controller::create_department_head,
        crate::modules::department_heads::controller::get_department_heads,
        crate::modules::department_heads::controller::get_department_head,
        crate::modules::department_heads::controller::delete_department_head,
        crate::modules::uploads::controller::create_upload,
        crate::modules::uploads::controller::get_uploads,
        crate::modules::uploads::controller::get_upload,
        crate::modules::uploads::controller::replace_upload,
        crate::modules::uploads::controller::delete_upload,
    ),
    components(
        schemas(
            User,
            UserRole,
            UserResponse,
            CreateUserDto,
            UpdateProfileDto,
            PaginatedUsersResponse,
            Student,
            StudentDetails,
            Level,
            CreateStudentDto,
            UpdateStudentDto,
            PaginatedStudentsResponse,
            Parent,
            ParentDetails,
            Relationship,
            CreateParentDto,
            UpdateParentDto,
            PaginatedParentsResponse,
            DepartmentHead,
            DepartmentHeadDetails,
            CreateDepartmentHeadDto,
            PaginatedDepartmentHeadsResponse,
            ListKind,
            UploadRecord,
            UploadRecordResponse,
            PaginatedUploadsResponse,
            PaginationMeta,
            PaginationParams,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Users", description = "Account management: profiles, role flags, pictures, search"),
        (name = "Students", description = "Student enrollment and search"),
        (name = "Parents", description = "Parent registration and student links"),
        (name = "Department Heads", description = "Department head appointments"),
        (name = "Uploads", description = "Bulk lecturer/student list uploads")
    ),
    info(
        title = "CampusKit API",
        description = "School management backend: accounts, role records, and bulk list uploads."
    )
)]
pub struct ApiDoc;
