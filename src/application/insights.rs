//! Cross-cluster insight generator: correlates search-term clusters against
//! product clusters to produce opportunity, competition, and trend reports.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::cluster::{ProductCluster, TermCluster};
use crate::domain::entities::product::ProductRecord;
use crate::domain::values::scoring;

/// Composite opportunity scores must clear this to be emitted.
const OPPORTUNITY_THRESHOLD: f64 = 70.0;
/// Trend confidence must clear this to be emitted.
const TREND_CONFIDENCE_THRESHOLD: f64 = 0.7;
/// Price at which the price factor saturates to 1.0.
const PRICE_SATURATION: f64 = 100.0;

#[derive(Debug, Clone, Serialize)]
pub struct OpportunityInsight {
    pub id: String,
    pub niche: String,
    pub keywords: Vec<String>,
    pub search_volume: f64,
    /// Composite score in (70, 100].
    pub score: f64,
    pub related_product_clusters: Vec<String>,
    pub avg_price: Option<f64>,
    pub avg_rating: Option<f64>,
    pub market_share: f64,
    /// Emergence score of the underlying niche, in [0,1].
    pub emergence: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetitorProfile {
    pub brand: String,
    pub market_share: f64,
    pub avg_rating: Option<f64>,
    pub avg_price: Option<f64>,
    pub product_count: usize,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetitionReport {
    pub id: String,
    pub cluster: String,
    /// Sorted by descending market share.
    pub competitors: Vec<CompetitorProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendInsight {
    pub id: String,
    pub cluster: String,
    pub direction: TrendDirection,
    pub confidence: f64,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct InsightBundle {
    pub generated_at: DateTime<Utc>,
    pub opportunities: Vec<OpportunityInsight>,
    pub competition: Vec<CompetitionReport>,
    pub trends: Vec<TrendInsight>,
}

/// Correlate term clusters against product clusters.
pub fn generate_insights(
    term_clusters: &[TermCluster],
    product_clusters: &[ProductCluster],
) -> InsightBundle {
    InsightBundle {
        generated_at: Utc::now(),
        opportunities: detect_opportunities(term_clusters, product_clusters),
        competition: analyze_competition(product_clusters),
        trends: detect_trends(term_clusters),
    }
}

/// A product cluster relates to a term cluster when any member product name
/// contains any of the cluster's keywords, case-insensitive.
fn related_product_clusters<'a>(
    term_cluster: &TermCluster,
    product_clusters: &'a [ProductCluster],
) -> Vec<&'a ProductCluster> {
    let keywords = term_cluster.keywords();
    product_clusters
        .iter()
        .filter(|pc| {
            pc.products.iter().any(|p| {
                let name = p.name.to_lowercase();
                keywords.iter().any(|k| name.contains(k.as_str()))
            })
        })
        .collect()
}

fn detect_opportunities(
    term_clusters: &[TermCluster],
    product_clusters: &[ProductCluster],
) -> Vec<OpportunityInsight> {
    let mut opportunities = Vec::new();

    for tc in term_clusters {
        let related = related_product_clusters(tc, product_clusters);
        if related.is_empty() {
            continue;
        }

        let avg_price = scoring::mean_present(related.iter().map(|pc| pc.metrics.avg_price));
        let avg_rating = scoring::mean_present(related.iter().map(|pc| pc.metrics.avg_rating));
        let market_share: f64 = related
            .iter()
            .flat_map(|pc| pc.products.iter())
            .filter_map(|p| p.market_share)
            .sum::<f64>()
            .clamp(0.0, 1.0);

        let volume_factor = scoring::normalized_volume(tc.metrics.total_volume);
        let click_share = tc.metrics.weighted_click_share.clamp(0.0, 1.0);
        let price_factor = (avg_price.unwrap_or(0.0) / PRICE_SATURATION).clamp(0.0, 1.0);
        let rating_factor = (avg_rating.unwrap_or(0.0) / 5.0).clamp(0.0, 1.0);

        // volume 30%, inverse click-share 20%, price 20%, rating 15%,
        // inverse market-share 15%
        let score = 100.0
            * (0.30 * volume_factor
                + 0.20 * (1.0 - click_share)
                + 0.20 * price_factor
                + 0.15 * rating_factor
                + 0.15 * (1.0 - market_share));

        if score <= OPPORTUNITY_THRESHOLD {
            continue;
        }

        let growth_90d = scoring::mean_present(tc.terms.iter().map(|t| t.growth_90d))
            .unwrap_or(0.0);
        let growth_180d = scoring::mean_present(tc.terms.iter().map(|t| t.growth_180d))
            .unwrap_or(0.0);
        let emergence =
            scoring::emergence_score(tc.metrics.total_volume, growth_90d, growth_180d);

        let related_names: Vec<String> = related.iter().map(|pc| pc.name.clone()).collect();
        opportunities.push(OpportunityInsight {
            id: uuid::Uuid::new_v4().to_string(),
            niche: tc.name.clone(),
            keywords: tc.keywords(),
            search_volume: tc.metrics.total_volume,
            score,
            description: format!(
                "High demand around \"{}\" ({:.0} monthly searches) with {} related product segment(s): {}",
                tc.name,
                tc.metrics.total_volume,
                related_names.len(),
                related_names.join(", ")
            ),
            related_product_clusters: related_names,
            avg_price,
            avg_rating,
            market_share,
            emergence,
        });
    }

    opportunities
}

fn analyze_competition(product_clusters: &[ProductCluster]) -> Vec<CompetitionReport> {
    let mut reports = Vec::new();

    for pc in product_clusters {
        let mut by_brand: BTreeMap<String, Vec<&ProductRecord>> = BTreeMap::new();
        for product in &pc.products {
            let brand = product
                .brand
                .clone()
                .unwrap_or_else(|| "Unknown".to_string());
            by_brand.entry(brand).or_default().push(product);
        }

        let cluster_avg_price = pc.metrics.avg_price;

        let mut competitors: Vec<CompetitorProfile> = by_brand
            .into_iter()
            .map(|(brand, products)| {
                let market_share: f64 = products.iter().filter_map(|p| p.market_share).sum();
                let avg_rating = scoring::mean_present(products.iter().map(|p| p.rating));
                let avg_price = scoring::mean_present(products.iter().map(|p| p.price));

                let mut strengths = Vec::new();
                let mut weaknesses = Vec::new();
                if let Some(rating) = avg_rating {
                    if rating > 4.0 {
                        strengths.push("Strong ratings".to_string());
                    } else if rating < 3.5 {
                        weaknesses.push("Weak ratings".to_string());
                    }
                }
                if market_share > 0.3 {
                    strengths.push("Dominant market share".to_string());
                } else if market_share < 0.1 {
                    weaknesses.push("Marginal market share".to_string());
                }
                if let (Some(price), Some(cluster_price)) = (avg_price, cluster_avg_price) {
                    if price < cluster_price {
                        strengths.push("Priced below segment average".to_string());
                    } else if price > cluster_price * 1.2 {
                        weaknesses.push("Priced well above segment average".to_string());
                    }
                }

                CompetitorProfile {
                    brand,
                    market_share,
                    avg_rating,
                    avg_price,
                    product_count: products.len(),
                    strengths,
                    weaknesses,
                }
            })
            .collect();

        competitors.sort_by(|a, b| {
            b.market_share
                .partial_cmp(&a.market_share)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.brand.cmp(&b.brand))
        });

        reports.push(CompetitionReport {
            id: uuid::Uuid::new_v4().to_string(),
            cluster: pc.name.clone(),
            competitors,
        });
    }

    reports
}

/// Strength of a Growth tag value for confidence weighting.
fn growth_tag_strength(value: &str) -> f64 {
    let v = value.to_lowercase();
    if v.contains("explosive") {
        1.0
    } else if v.contains("high") || v.contains("strong") {
        0.8
    } else if v.contains("rising") || v.contains("up") {
        0.6
    } else if v.contains("stable") || v.contains("flat") {
        0.4
    } else if v.contains("declining") || v.contains("down") {
        0.2
    } else {
        0.5
    }
}

fn trend_direction(value: &str) -> TrendDirection {
    let v = value.to_lowercase();
    if v.contains("up") || v.contains("rising") || v.contains("high") || v.contains("explosive") {
        TrendDirection::Up
    } else if v.contains("down") || v.contains("declining") {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    }
}

fn detect_trends(term_clusters: &[TermCluster]) -> Vec<TrendInsight> {
    let mut trends = Vec::new();

    for tc in term_clusters {
        let Some(growth_tag) = tc.tags.iter().find(|t| t.category == "Growth") else {
            continue;
        };

        let direction = trend_direction(&growth_tag.value);
        let strength = growth_tag_strength(&growth_tag.value);
        let volume_factor = scoring::normalized_volume(tc.metrics.total_volume);
        let click_share = tc.metrics.weighted_click_share.clamp(0.0, 1.0);

        // volume 40%, growth-tag strength 40%, inverse click-share 20%
        let confidence = 0.4 * volume_factor + 0.4 * strength + 0.2 * (1.0 - click_share);

        if confidence <= TREND_CONFIDENCE_THRESHOLD {
            continue;
        }

        trends.push(TrendInsight {
            id: uuid::Uuid::new_v4().to_string(),
            cluster: tc.name.clone(),
            direction,
            confidence,
            description: format!(
                "\"{}\" is trending {} (growth signal: {})",
                tc.name,
                match direction {
                    TrendDirection::Up => "up",
                    TrendDirection::Down => "down",
                    TrendDirection::Stable => "sideways",
                },
                growth_tag.value
            ),
        });
    }

    trends
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_tag_strength_ordering() {
        assert!(growth_tag_strength("Explosive") > growth_tag_strength("High"));
        assert!(growth_tag_strength("High") > growth_tag_strength("Declining"));
        assert_eq!(growth_tag_strength("weird value"), 0.5);
    }

    #[test]
    fn test_trend_direction_parsing() {
        assert_eq!(trend_direction("Rising fast"), TrendDirection::Up);
        assert_eq!(trend_direction("declining"), TrendDirection::Down);
        assert_eq!(trend_direction("plateau"), TrendDirection::Stable);
    }
}
