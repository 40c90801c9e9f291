pub mod context;
pub mod controls;
pub mod surface;
