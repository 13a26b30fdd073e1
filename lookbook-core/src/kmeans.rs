//! Lloyd's k-means over RGB points.
//!
//! Centers are initialized uniformly at random inside the bounding box of the
//! data. Each attempt runs until the iteration budget is spent or no center
//! moves further than `epsilon`; the attempt with the lowest compactness wins.

use rand::Rng;

/// A point in RGB space.
pub type Point = [f32; 3];

/// Termination and restart settings for [`kmeans`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansParams {
    /// Number of clusters
    pub k: usize,
    /// Maximum number of Lloyd iterations per attempt
    pub max_iter: usize,
    /// Stop once the largest center shift is at most this distance
    pub epsilon: f32,
    /// Number of random restarts
    pub attempts: usize,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            k: 5,
            max_iter: 100,
            epsilon: 0.2,
            attempts: 10,
        }
    }
}

/// Result of a clustering run.
#[derive(Debug, Clone)]
pub struct Clustering {
    /// Cluster index for every input point
    pub labels: Vec<usize>,
    /// Final cluster centers
    pub centers: Vec<Point>,
    /// Sum of squared distances from each point to its center
    pub compactness: f64,
}

impl Clustering {
    /// Count the members of each cluster.
    pub fn histogram(&self) -> Vec<usize> {
        let mut counts = vec![0; self.centers.len()];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }
}

#[inline]
fn sq_dist(a: &Point, b: &Point) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

fn nearest(point: &Point, centers: &[Point]) -> (usize, f32) {
    let mut best = (0, f32::MAX);
    for (i, center) in centers.iter().enumerate() {
        let d = sq_dist(point, center);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

/// Assign every point to its nearest center, returning the compactness.
fn assign(points: &[Point], centers: &[Point], labels: &mut [usize]) -> f64 {
    let mut compactness = 0.0f64;
    for (point, label) in points.iter().zip(labels.iter_mut()) {
        let (idx, d) = nearest(point, centers);
        *label = idx;
        compactness += d as f64;
    }
    compactness
}

fn bounding_box(points: &[Point]) -> (Point, Point) {
    let mut lo = [f32::MAX; 3];
    let mut hi = [f32::MIN; 3];
    for p in points {
        for c in 0..3 {
            lo[c] = lo[c].min(p[c]);
            hi[c] = hi[c].max(p[c]);
        }
    }
    (lo, hi)
}

fn random_centers(k: usize, lo: &Point, hi: &Point, rng: &mut impl Rng) -> Vec<Point> {
    (0..k)
        .map(|_| {
            let mut center = [0.0; 3];
            for c in 0..3 {
                center[c] = lo[c] + rng.random::<f32>() * (hi[c] - lo[c]);
            }
            center
        })
        .collect()
}

/// Recompute centers as the mean of their members.
///
/// A cluster that lost all members is moved onto the point that currently
/// sits farthest from its own center.
fn update_centers(points: &[Point], labels: &[usize], centers: &mut [Point]) {
    let k = centers.len();
    let mut sums = vec![[0.0f64; 3]; k];
    let mut counts = vec![0usize; k];
    for (p, &l) in points.iter().zip(labels) {
        for c in 0..3 {
            sums[l][c] += p[c] as f64;
        }
        counts[l] += 1;
    }

    for i in 0..k {
        if counts[i] > 0 {
            for c in 0..3 {
                centers[i][c] = (sums[i][c] / counts[i] as f64) as f32;
            }
        }
    }

    for i in 0..k {
        if counts[i] != 0 {
            continue;
        }
        let farthest = points
            .iter()
            .zip(labels)
            .enumerate()
            .filter(|(_, (_, &l))| counts[l] > 1)
            .map(|(idx, (p, &l))| (idx, sq_dist(p, &centers[l])))
            .max_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((idx, _)) = farthest {
            counts[labels[idx]] -= 1;
            counts[i] = 1;
            centers[i] = points[idx];
        }
    }
}

fn run_attempt(points: &[Point], params: &KMeansParams, rng: &mut impl Rng) -> Clustering {
    let (lo, hi) = bounding_box(points);
    let mut centers = random_centers(params.k, &lo, &hi, rng);
    let mut labels = vec![0usize; points.len()];
    let eps_sq = params.epsilon * params.epsilon;

    for _ in 0..params.max_iter.max(1) {
        assign(points, &centers, &mut labels);
        let previous = centers.clone();
        update_centers(points, &labels, &mut centers);

        let max_shift = previous
            .iter()
            .zip(&centers)
            .map(|(a, b)| sq_dist(a, b))
            .fold(0.0f32, f32::max);
        if max_shift <= eps_sq {
            break;
        }
    }

    let compactness = assign(points, &centers, &mut labels);
    Clustering {
        labels,
        centers,
        compactness,
    }
}

/// Cluster `points` into `params.k` groups.
///
/// Returns an empty clustering when there are no points or `k` is zero.
pub fn kmeans(points: &[Point], params: &KMeansParams, rng: &mut impl Rng) -> Clustering {
    if points.is_empty() || params.k == 0 {
        return Clustering {
            labels: Vec::new(),
            centers: vec![[0.0; 3]; params.k],
            compactness: 0.0,
        };
    }

    let mut best: Option<Clustering> = None;
    for _ in 0..params.attempts.max(1) {
        let candidate = run_attempt(points, params, rng);
        let better = best
            .as_ref()
            .map_or(true, |b| candidate.compactness < b.compactness);
        if better {
            best = Some(candidate);
        }
    }
    // attempts >= 1, so a clustering was produced
    best.unwrap_or_else(|| run_attempt(points, params, rng))
}
