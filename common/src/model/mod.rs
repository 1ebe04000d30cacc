pub mod office_bearer;
pub mod validation;
