//! Density-based clustering over embedding vectors (simplified DBSCAN,
//! cosine distance).

/// Labels per input vector: `Some(cluster)` or `None` for noise.
#[derive(Debug, Clone)]
pub struct DensityResult {
    pub labels: Vec<Option<usize>>,
    pub n_clusters: usize,
}

/// Run DBSCAN with neighborhood radius `eps` (cosine distance) and core
/// threshold `min_points`. Cluster numbering follows input order, so the
/// result is deterministic for identical vectors.
pub fn cluster_vectors(vectors: &[Vec<f32>], eps: f64, min_points: usize) -> DensityResult {
    let n = vectors.len();
    if n == 0 {
        return DensityResult {
            labels: Vec::new(),
            n_clusters: 0,
        };
    }
    if n < min_points {
        return DensityResult {
            labels: vec![None; n],
            n_clusters: 0,
        };
    }

    let distances: Vec<Vec<f64>> = vectors
        .iter()
        .map(|a| vectors.iter().map(|b| cosine_distance(a, b)).collect())
        .collect();

    // core points have at least min_points neighbors within eps (self included)
    let core: Vec<bool> = (0..n)
        .map(|i| distances[i].iter().filter(|&&d| d <= eps).count() >= min_points)
        .collect();

    let mut labels: Vec<Option<usize>> = vec![None; n];
    let mut current = 0usize;

    for i in 0..n {
        if labels[i].is_some() || !core[i] {
            continue;
        }

        let mut stack = vec![i];
        while let Some(point) = stack.pop() {
            if labels[point].is_some() {
                continue;
            }
            labels[point] = Some(current);

            for (j, &dist) in distances[point].iter().enumerate() {
                if dist <= eps && labels[j].is_none() {
                    if core[j] {
                        stack.push(j);
                    } else {
                        // border point: joins the cluster but never expands it
                        labels[j] = Some(current);
                    }
                }
            }
        }

        current += 1;
    }

    DensityResult {
        labels,
        n_clusters: current,
    }
}

/// `1 - cosine similarity`, in [0,2]. Zero-magnitude vectors are maximally
/// distant from everything.
fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}
