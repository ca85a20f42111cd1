pub mod route;
pub mod truthy;
