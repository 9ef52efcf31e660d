pub mod advance;
pub mod apply;
pub mod filler;
pub mod matcher;
pub mod policy;
