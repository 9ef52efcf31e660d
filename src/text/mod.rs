pub mod normalize;
pub mod similarity;
