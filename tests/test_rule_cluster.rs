//! Tests for rule-based clustering of search terms and products.

mod common;

use std::sync::Arc;

use common::{make_product, make_term};
use nichelens::application::rule_cluster::ClusterSettings;
use nichelens::infrastructure::embeddings::noop::NoopEmbedder;
use nichelens::{ClusterMode, NicheLens};

fn lens() -> NicheLens {
    NicheLens::with_providers(Arc::new(NoopEmbedder), None)
}

#[tokio::test]
async fn test_two_related_terms_form_one_cluster() {
    let lens = lens();
    let records = vec![
        make_term("sleep gummies", 1000.0).with_growth(0.2, 0.2),
        make_term("gummy sleep aid", 800.0).with_growth(0.1, 0.1),
    ];
    let settings = ClusterSettings {
        similarity_threshold: 0.5,
        min_cluster_size: 2,
        max_clusters: 10,
    };

    let clusters = lens
        .cluster_search_terms(&records, ClusterMode::Rules, &settings)
        .await
        .unwrap();

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].terms.len(), 2);
    let terms: Vec<&str> = clusters[0].terms.iter().map(|t| t.term.as_str()).collect();
    assert!(terms.contains(&"sleep gummies"));
    assert!(terms.contains(&"gummy sleep aid"));
}

#[tokio::test]
async fn test_rules_mode_is_idempotent() {
    let lens = lens();
    let records = vec![
        make_term("collagen peptides", 5000.0),
        make_term("collagen peptide", 4000.0),
        make_term("whey protein", 9000.0),
        make_term("whey proteins", 2500.0),
        make_term("dog toys", 700.0),
    ];
    let settings = ClusterSettings::default();

    let first = lens
        .cluster_search_terms(&records, ClusterMode::Rules, &settings)
        .await
        .unwrap();
    let second = lens
        .cluster_search_terms(&records, ClusterMode::Rules, &settings)
        .await
        .unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.name, b.name);
        let ta: Vec<&str> = a.terms.iter().map(|t| t.term.as_str()).collect();
        let tb: Vec<&str> = b.terms.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(ta, tb);
    }
}

#[tokio::test]
async fn test_cluster_name_from_shared_words() {
    let lens = lens();
    let records = vec![
        make_term("magnesium gummies", 1000.0),
        make_term("magnesium gummies for adults", 900.0),
    ];
    let settings = ClusterSettings {
        similarity_threshold: 0.5,
        ..Default::default()
    };
    let clusters = lens
        .cluster_search_terms(&records, ClusterMode::Rules, &settings)
        .await
        .unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].name, "magnesium gummies");
    assert_eq!(clusters[0].id, "magnesium-gummies");
}

#[tokio::test]
async fn test_empty_input_yields_empty_clusters() {
    let lens = lens();
    let clusters = lens
        .cluster_search_terms(&[], ClusterMode::Rules, &ClusterSettings::default())
        .await
        .unwrap();
    assert!(clusters.is_empty());
}

#[tokio::test]
async fn test_out_of_range_threshold_rejected() {
    let lens = lens();
    let settings = ClusterSettings {
        similarity_threshold: 1.5,
        ..Default::default()
    };
    let result = lens
        .cluster_search_terms(&[make_term("a", 1.0)], ClusterMode::Rules, &settings)
        .await;
    assert!(result.is_err());
}

#[test]
fn test_products_cluster_by_category_and_attributes() {
    let lens = lens();
    let records = vec![
        make_product("Melatonin Gummies A", Some("BrandA"), Some(19.0), Some(4.5), None, Some("Sleep")),
        make_product("Melatonin Gummies B", Some("BrandB"), Some(21.0), Some(4.3), None, Some("Sleep")),
        make_product("Casein Protein", Some("BrandC"), Some(55.0), Some(4.1), None, Some("Fitness")),
    ];
    let settings = ClusterSettings {
        similarity_threshold: 0.7,
        min_cluster_size: 2,
        max_clusters: 5,
    };

    let clusters = lens.cluster_products(&records, &settings).unwrap();

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].name, "Sleep");
    assert_eq!(clusters[0].products.len(), 2);
    assert!((clusters[0].metrics.avg_price.unwrap() - 20.0).abs() < 1e-9);
}

#[test]
fn test_product_clusters_never_empty_and_disjoint() {
    let lens = lens();
    let records: Vec<_> = (0..12)
        .map(|i| {
            make_product(
                &format!("Product {i}"),
                None,
                Some(10.0 + i as f64),
                Some(4.0),
                None,
                Some(if i % 2 == 0 { "Sleep" } else { "Energy" }),
            )
        })
        .collect();
    let settings = ClusterSettings::default();

    let clusters = lens.cluster_products(&records, &settings).unwrap();

    let mut seen = std::collections::HashSet::new();
    for cluster in &clusters {
        assert!(!cluster.products.is_empty());
        for product in &cluster.products {
            assert!(
                seen.insert(product.name.clone()),
                "product assigned to two clusters: {}",
                product.name
            );
        }
    }
}
