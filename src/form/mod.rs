pub mod capture;
pub mod classifier;
pub mod form_model;
pub mod locate;
