pub mod index;
pub mod store;
pub mod template_model;
