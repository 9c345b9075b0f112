pub mod adjustment;
pub mod product;
