pub mod cluster;
pub mod product;
pub mod search_term;
