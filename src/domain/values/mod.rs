pub mod scoring;
pub mod similarity;
pub mod tag_rule;
