pub mod assignment_status;
pub mod ids;
