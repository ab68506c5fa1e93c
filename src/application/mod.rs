pub mod buckets;
pub mod dbscan;
pub mod embedding_cluster;
pub mod insights;
pub mod rule_cluster;
pub mod tagging;
