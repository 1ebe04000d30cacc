pub mod model;
pub mod responses;
