pub mod document;
pub mod dom;
pub mod poll;
