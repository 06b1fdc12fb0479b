//! Standard scaler and K-Means cluster model for the regular tier

use crate::error::{SegmentError, SegmentResult};
use crate::rfm::{CustomerProfile, Feature};
use crate::segment::RegularSegment;
use ndarray::{s, Array1, Array2, ArrayView1, Axis};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Number of clusters, one per regular-tier label
pub const N_CLUSTERS: usize = 4;

/// Recency, Frequency, Monetary
pub const N_FEATURES: usize = 3;

/// Fewest training profiles with any spread to standardize.
///
/// Below `N_CLUSTERS` distinct points some centroids start as duplicates and
/// stay empty, keeping their seeded position.
pub const MIN_TRAINING_PROFILES: usize = 2;

/// K-Means training knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansParams {
    /// Hard cap on Lloyd iterations
    pub max_iterations: usize,
    /// Stop once no centroid moves further than this (scaled units)
    pub tolerance: f64,
    /// Seed for k-means++ initialisation
    pub seed: u64,
    /// Independent seedings; the run with the lowest inertia wins
    pub n_runs: usize,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            max_iterations: 300,
            tolerance: 1e-4,
            seed: 42,
            n_runs: 10,
        }
    }
}

/// Per-feature mean and population standard deviation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: [f64; N_FEATURES],
    pub std_dev: [f64; N_FEATURES],
}

impl ScalerParams {
    /// Fit on an `(n_samples, 3)` raw feature matrix.
    pub fn fit(features: &Array2<f64>) -> SegmentResult<Self> {
        let mean = features
            .mean_axis(Axis(0))
            .ok_or(SegmentError::InsufficientData {
                required: 1,
                actual: 0,
            })?;
        let std_dev = features.std_axis(Axis(0), 0.0);

        let scaler = Self {
            mean: to_point(mean.view()),
            std_dev: to_point(std_dev.view()),
        };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Standardize one raw feature vector
    pub fn transform(&self, raw: &[f64; N_FEATURES]) -> [f64; N_FEATURES] {
        let mut scaled = [0.0; N_FEATURES];
        for j in 0..N_FEATURES {
            scaled[j] = (raw[j] - self.mean[j]) / self.std_dev[j];
        }
        scaled
    }

    /// Standardize every row of a raw feature matrix
    pub fn transform_all(&self, features: &Array2<f64>) -> Array2<f64> {
        let mean = Array1::from(self.mean.to_vec());
        let std_dev = Array1::from(self.std_dev.to_vec());
        (features - &mean) / &std_dev
    }

    fn validate(&self) -> SegmentResult<()> {
        for feature in Feature::ALL {
            let j = feature.index();
            let (mean, std_dev) = (self.mean[j], self.std_dev[j]);
            if !mean.is_finite() || !std_dev.is_finite() {
                return Err(SegmentError::InvalidModel {
                    reason: format!("non-finite scaler parameters for {feature}"),
                });
            }
            // Relative floor keeps rounding noise from passing as variance
            if std_dev <= mean.abs().max(1.0) * 1e-12 {
                return Err(SegmentError::DegenerateFeature { feature });
            }
        }
        Ok(())
    }
}

/// Trained scaler, centroids and centroid labels. Immutable after training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterModel {
    pub scaler: ScalerParams,
    /// Centroids in standardized space, indexed by cluster
    pub centroids: [[f64; N_FEATURES]; N_CLUSTERS],
    /// Label of each centroid; a permutation of the four regular labels
    pub centroid_labels: [RegularSegment; N_CLUSTERS],
}

impl ClusterModel {
    /// Check the invariants a loaded or hand-built model must hold.
    pub fn validate(&self) -> SegmentResult<()> {
        self.scaler.validate()?;

        if self.centroids.iter().flatten().any(|v| !v.is_finite()) {
            return Err(SegmentError::InvalidModel {
                reason: "non-finite centroid coordinate".to_string(),
            });
        }

        for label in RegularSegment::ALL {
            if !self.centroid_labels.contains(&label) {
                return Err(SegmentError::InvalidModel {
                    reason: format!("no centroid is labelled {label}"),
                });
            }
        }
        Ok(())
    }

    /// Index of the centroid nearest to an already standardized point.
    ///
    /// Equidistant centroids resolve to the lowest index.
    pub fn nearest_centroid(&self, scaled: &[f64; N_FEATURES]) -> usize {
        nearest(
            ArrayView1::from(&scaled[..]),
            self.centroids.iter().map(|c| ArrayView1::from(&c[..])),
        )
    }
}

/// Outcome of a training run, with diagnostics over the training set
#[derive(Debug, Clone)]
pub struct FitReport {
    pub model: ClusterModel,
    /// Standardized training features `(n_samples, 3)`
    pub features: Array2<f64>,
    /// Cluster index of each training profile
    pub assignments: Vec<usize>,
    /// Lloyd iterations actually run
    pub iterations: usize,
    /// Whether the centroid shift fell below tolerance before the cap
    pub converged: bool,
    /// Within-cluster sum of squares
    pub inertia: f64,
}

impl FitReport {
    /// Training profiles per cluster
    pub fn cluster_sizes(&self) -> [usize; N_CLUSTERS] {
        let mut sizes = [0; N_CLUSTERS];
        for &cluster in &self.assignments {
            sizes[cluster] += 1;
        }
        sizes
    }

    /// Mean silhouette coefficient over the first `sample_size` training points
    pub fn silhouette_sample(&self, sample_size: usize) -> f64 {
        let n_samples = self.features.nrows().min(sample_size);
        if n_samples < 2 {
            return 0.0;
        }
        let sample = self.features.slice(s![..n_samples, ..]);

        let total: f64 = sample
            .outer_iter()
            .enumerate()
            .map(|(i, point)| {
                let mut sums = [0.0; N_CLUSTERS];
                let mut counts = [0usize; N_CLUSTERS];
                for (j, other) in sample.outer_iter().enumerate() {
                    if i != j {
                        sums[self.assignments[j]] += euclidean_distance(point, other);
                        counts[self.assignments[j]] += 1;
                    }
                }
                silhouette(self.assignments[i], &sums, &counts)
            })
            .sum();

        total / n_samples as f64
    }
}

/// `(b - a) / max(a, b)` from per-cluster distance sums; zero for a point
/// alone in its cluster or with no other cluster to compare against
fn silhouette(own: usize, sums: &[f64; N_CLUSTERS], counts: &[usize; N_CLUSTERS]) -> f64 {
    if counts[own] == 0 {
        return 0.0;
    }
    let a = sums[own] / counts[own] as f64;
    let b = (0..N_CLUSTERS)
        .filter(|&cluster| cluster != own && counts[cluster] > 0)
        .map(|cluster| sums[cluster] / counts[cluster] as f64)
        .fold(f64::INFINITY, f64::min);

    if b.is_infinite() || a.max(b) == 0.0 {
        0.0
    } else {
        (b - a) / a.max(b)
    }
}

/// Fit the scaler and K-Means model on regular-tier training profiles.
pub fn fit(profiles: &[CustomerProfile], params: &KMeansParams) -> SegmentResult<ClusterModel> {
    fit_with_report(profiles, params).map(|report| report.model)
}

/// Fit the model and keep training diagnostics.
///
/// # Arguments
/// * `profiles` - Regular-tier training profiles (outliers already removed)
/// * `params` - Iteration cap, convergence tolerance, seed and restart count
///
/// # Returns
/// * `FitReport` with the trained `ClusterModel`, assignments and inertia
///
/// Each of `params.n_runs` runs seeds with k-means++ from one fixed-seed
/// generator, then iterates Lloyd steps until the largest centroid shift
/// drops below `params.tolerance` or `params.max_iterations` is reached.
/// The run with the lowest inertia is kept, earliest first on ties.
pub fn fit_with_report(
    profiles: &[CustomerProfile],
    params: &KMeansParams,
) -> SegmentResult<FitReport> {
    if profiles.len() < MIN_TRAINING_PROFILES {
        return Err(SegmentError::InsufficientData {
            required: MIN_TRAINING_PROFILES,
            actual: profiles.len(),
        });
    }
    for profile in profiles {
        profile.ensure_finite()?;
    }

    let raw = Array2::from_shape_fn((profiles.len(), N_FEATURES), |(i, j)| {
        profiles[i].features()[j]
    });
    let scaler = ScalerParams::fit(&raw)?;
    let features = scaler.transform_all(&raw);

    let mut rng = Pcg64Mcg::seed_from_u64(params.seed);
    let mut best = run_lloyd(&features, params, &mut rng);
    for _ in 1..params.n_runs {
        let run = run_lloyd(&features, params, &mut rng);
        if run.inertia < best.inertia {
            best = run;
        }
    }

    let LloydRun {
        centroids,
        assignments,
        iterations,
        converged,
        inertia,
    } = best;
    let centroids = to_centroid_array(&centroids);
    let model = ClusterModel {
        scaler,
        centroid_labels: label_centroids(&centroids),
        centroids,
    };

    Ok(FitReport {
        model,
        features,
        assignments,
        iterations,
        converged,
        inertia,
    })
}

struct LloydRun {
    centroids: Array2<f64>,
    assignments: Vec<usize>,
    iterations: usize,
    converged: bool,
    inertia: f64,
}

/// One k-means++ seeding followed by bounded Lloyd refinement
fn run_lloyd(features: &Array2<f64>, params: &KMeansParams, rng: &mut Pcg64Mcg) -> LloydRun {
    let mut centroids = init_plus_plus(features, rng);
    let mut assignments = vec![0; features.nrows()];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < params.max_iterations {
        iterations += 1;
        assign(features, &centroids, &mut assignments);

        let mut sums = Array2::<f64>::zeros((N_CLUSTERS, N_FEATURES));
        let mut counts = [0usize; N_CLUSTERS];
        for (point, &cluster) in features.outer_iter().zip(&assignments) {
            let mut sum = sums.row_mut(cluster);
            sum += &point;
            counts[cluster] += 1;
        }

        let mut max_shift: f64 = 0.0;
        for cluster in 0..N_CLUSTERS {
            // Empty clusters keep their previous centroid
            if counts[cluster] == 0 {
                continue;
            }
            let updated = &sums.row(cluster) / counts[cluster] as f64;
            max_shift = max_shift.max(euclidean_distance(updated.view(), centroids.row(cluster)));
            centroids.row_mut(cluster).assign(&updated);
        }

        if max_shift < params.tolerance {
            converged = true;
            break;
        }
    }
    assign(features, &centroids, &mut assignments);

    let inertia = compute_inertia(features, &assignments, &centroids);
    LloydRun {
        centroids,
        assignments,
        iterations,
        converged,
        inertia,
    }
}

/// Assign a profile to the label of its nearest centroid.
pub fn predict(profile: &CustomerProfile, model: &ClusterModel) -> SegmentResult<RegularSegment> {
    profile.ensure_finite()?;
    model.validate()?;

    let scaled = model.scaler.transform(&profile.features());
    let cluster = model.nearest_centroid(&scaled);
    Ok(model.centroid_labels[cluster])
}

/// Name each centroid from its position in RFM space.
///
/// Centroids are ranked by recency (ascending) and by monetary (descending);
/// the smallest rank sum is Premium and the largest remaining one is Lapsed.
/// Of the last two, the higher monetary centroid is Regular and the other is
/// Occasional. Ties always go to the lower centroid index.
fn label_centroids(
    centroids: &[[f64; N_FEATURES]; N_CLUSTERS],
) -> [RegularSegment; N_CLUSTERS] {
    let recency = Feature::Recency.index();
    let monetary = Feature::Monetary.index();

    let recency_rank = ranks(|a, b| centroids[a][recency].total_cmp(&centroids[b][recency]));
    let monetary_rank = ranks(|a, b| centroids[b][monetary].total_cmp(&centroids[a][monetary]));
    let score: Vec<usize> = (0..N_CLUSTERS)
        .map(|i| recency_rank[i] + monetary_rank[i])
        .collect();

    let mut by_score: Vec<usize> = (0..N_CLUSTERS).collect();
    by_score.sort_by_key(|&i| (score[i], i));

    let premium = by_score[0];
    let lapsed_score = score[by_score[N_CLUSTERS - 1]];
    let lapsed = by_score[1..]
        .iter()
        .copied()
        .find(|&i| score[i] == lapsed_score)
        .unwrap_or(by_score[N_CLUSTERS - 1]);

    let mut rest: Vec<usize> = by_score
        .iter()
        .copied()
        .filter(|&i| i != premium && i != lapsed)
        .collect();
    rest.sort_by(|&a, &b| {
        centroids[b][monetary]
            .total_cmp(&centroids[a][monetary])
            .then(a.cmp(&b))
    });

    let mut labels = [RegularSegment::Regular; N_CLUSTERS];
    labels[premium] = RegularSegment::Premium;
    labels[lapsed] = RegularSegment::Lapsed;
    labels[rest[0]] = RegularSegment::Regular;
    labels[rest[1]] = RegularSegment::Occasional;
    labels
}

/// Rank position of every centroid under `compare`, ties broken by index
fn ranks(compare: impl Fn(usize, usize) -> Ordering) -> [usize; N_CLUSTERS] {
    let mut order: Vec<usize> = (0..N_CLUSTERS).collect();
    order.sort_by(|&a, &b| compare(a, b).then(a.cmp(&b)));

    let mut rank = [0; N_CLUSTERS];
    for (position, &cluster) in order.iter().enumerate() {
        rank[cluster] = position;
    }
    rank
}

/// k-means++ seeding: each next centroid is drawn with probability
/// proportional to its squared distance from the closest chosen one.
fn init_plus_plus(features: &Array2<f64>, rng: &mut Pcg64Mcg) -> Array2<f64> {
    let n_samples = features.nrows();
    let mut centroids = Array2::<f64>::zeros((N_CLUSTERS, N_FEATURES));

    let first = rng.gen_range(0..n_samples);
    centroids.row_mut(0).assign(&features.row(first));

    let mut closest: Vec<f64> = features
        .outer_iter()
        .map(|point| squared_distance(point, centroids.row(0)))
        .collect();

    for cluster in 1..N_CLUSTERS {
        let total: f64 = closest.iter().sum();
        let chosen = if total > 0.0 {
            let mut target = rng.gen::<f64>() * total;
            let mut chosen = None;
            for (i, &weight) in closest.iter().enumerate() {
                if target < weight {
                    chosen = Some(i);
                    break;
                }
                target -= weight;
            }
            // Rounding can leave target just past the last weight
            chosen
                .or_else(|| closest.iter().rposition(|&w| w > 0.0))
                .unwrap_or(0)
        } else {
            // Fewer distinct points than clusters
            rng.gen_range(0..n_samples)
        };

        centroids.row_mut(cluster).assign(&features.row(chosen));
        for (i, point) in features.outer_iter().enumerate() {
            closest[i] = closest[i].min(squared_distance(point, centroids.row(cluster)));
        }
    }

    centroids
}

fn assign(features: &Array2<f64>, centroids: &Array2<f64>, assignments: &mut [usize]) {
    for (point, slot) in features.outer_iter().zip(assignments.iter_mut()) {
        *slot = nearest(point, centroids.outer_iter());
    }
}

/// Index of the nearest centroid; strict comparison keeps the lowest index on ties
fn nearest<'a>(
    point: ArrayView1<'_, f64>,
    centroids: impl Iterator<Item = ArrayView1<'a, f64>>,
) -> usize {
    let mut min_distance = f64::INFINITY;
    let mut closest_cluster = 0;

    for (cluster_idx, centroid) in centroids.enumerate() {
        let distance = euclidean_distance(point, centroid);
        if distance < min_distance {
            min_distance = distance;
            closest_cluster = cluster_idx;
        }
    }

    closest_cluster
}

/// Within-cluster sum of squares
fn compute_inertia(features: &Array2<f64>, assignments: &[usize], centroids: &Array2<f64>) -> f64 {
    features
        .outer_iter()
        .zip(assignments)
        .map(|(point, &cluster)| squared_distance(point, centroids.row(cluster)))
        .sum()
}

fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

fn euclidean_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    squared_distance(a, b).sqrt()
}

fn to_point(values: ArrayView1<'_, f64>) -> [f64; N_FEATURES] {
    let mut point = [0.0; N_FEATURES];
    for (slot, &value) in point.iter_mut().zip(values.iter()) {
        *slot = value;
    }
    point
}

fn to_centroid_array(centroids: &Array2<f64>) -> [[f64; N_FEATURES]; N_CLUSTERS] {
    let mut out = [[0.0; N_FEATURES]; N_CLUSTERS];
    for (slot, row) in out.iter_mut().zip(centroids.outer_iter()) {
        *slot = to_point(row);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(recency: u32, frequency: u32, monetary: f64) -> CustomerProfile {
        CustomerProfile::from_rfm(recency, frequency, monetary)
    }

    /// Four well separated groups of three customers each
    fn training_profiles() -> Vec<CustomerProfile> {
        vec![
            // recent, big baskets
            profile(2, 9, 2400.0),
            profile(4, 10, 2600.0),
            profile(3, 8, 2500.0),
            // recent, modest spend
            profile(20, 5, 900.0),
            profile(22, 6, 1000.0),
            profile(25, 5, 950.0),
            // infrequent, small spend
            profile(120, 2, 200.0),
            profile(130, 1, 180.0),
            profile(125, 2, 220.0),
            // long gone
            profile(300, 1, 90.0),
            profile(320, 1, 60.0),
            profile(310, 1, 75.0),
        ]
    }

    fn unit_model(centroid_labels: [RegularSegment; N_CLUSTERS]) -> ClusterModel {
        ClusterModel {
            scaler: ScalerParams {
                mean: [0.0; N_FEATURES],
                std_dev: [1.0; N_FEATURES],
            },
            centroids: [
                [0.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [0.0, 2.0, 0.0],
                [0.0, 0.0, 2.0],
            ],
            centroid_labels,
        }
    }

    #[test]
    fn test_fit_separates_groups() {
        let report = fit_with_report(&training_profiles(), &KMeansParams::default()).unwrap();

        assert!(report.converged);
        assert_eq!(report.cluster_sizes(), [3; N_CLUSTERS]);
        assert!(report.inertia >= 0.0 && report.inertia.is_finite());

        let model = &report.model;
        assert_eq!(predict(&profile(3, 9, 2500.0), model).unwrap(), RegularSegment::Premium);
        assert_eq!(predict(&profile(21, 5, 950.0), model).unwrap(), RegularSegment::Regular);
        assert_eq!(predict(&profile(128, 2, 200.0), model).unwrap(), RegularSegment::Occasional);
        assert_eq!(predict(&profile(305, 1, 70.0), model).unwrap(), RegularSegment::Lapsed);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let params = KMeansParams::default();
        let first = fit(&training_profiles(), &params).unwrap();
        let second = fit(&training_profiles(), &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_scaler_uses_population_std() {
        let raw = Array2::from_shape_vec(
            (4, 3),
            vec![
                1.0, 1.0, 10.0, //
                3.0, 1.0, 20.0, //
                5.0, 3.0, 30.0, //
                7.0, 3.0, 40.0,
            ],
        )
        .unwrap();

        let scaler = ScalerParams::fit(&raw).unwrap();

        assert_eq!(scaler.mean, [4.0, 2.0, 25.0]);
        assert!((scaler.std_dev[0] - 5.0_f64.sqrt()).abs() < 1e-12);
        assert!((scaler.std_dev[1] - 1.0).abs() < 1e-12);
        assert!((scaler.transform(&[4.0, 3.0, 25.0])[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_recency_is_degenerate() {
        let profiles = vec![
            profile(7, 1, 10.0),
            profile(7, 2, 20.0),
            profile(7, 3, 30.0),
            profile(7, 4, 40.0),
        ];

        assert_eq!(
            fit(&profiles, &KMeansParams::default()),
            Err(SegmentError::DegenerateFeature {
                feature: Feature::Recency
            })
        );
    }

    #[test]
    fn test_too_few_training_profiles() {
        let profiles = vec![profile(1, 1, 1.0)];

        assert_eq!(
            fit(&profiles, &KMeansParams::default()),
            Err(SegmentError::InsufficientData {
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_fewer_profiles_than_clusters() {
        let profiles = vec![
            profile(1, 9, 900.0),
            profile(30, 4, 300.0),
            profile(90, 2, 90.0),
        ];

        let report = fit_with_report(&profiles, &KMeansParams::default()).unwrap();

        assert!(report.model.validate().is_ok());
        assert_eq!(report.cluster_sizes().iter().sum::<usize>(), 3);
        assert_eq!(report.cluster_sizes().iter().filter(|&&size| size == 0).count(), 1);
        assert!(report.inertia.abs() < 1e-12);
        // Every point is alone in its cluster
        assert_eq!(report.silhouette_sample(100), 0.0);
    }

    #[test]
    fn test_duplicate_points_still_yield_a_full_labelling() {
        let profiles = vec![
            profile(1, 1, 10.0),
            profile(1, 1, 10.0),
            profile(1, 1, 10.0),
            profile(9, 5, 90.0),
        ];

        let model = fit(&profiles, &KMeansParams::default()).unwrap();

        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_iteration_cap_is_respected() {
        let params = KMeansParams {
            max_iterations: 1,
            tolerance: 0.0,
            seed: 7,
            n_runs: 3,
        };

        let report = fit_with_report(&training_profiles(), &params).unwrap();

        assert_eq!(report.iterations, 1);
        assert!(!report.converged);
    }

    #[test]
    fn test_predict_nearest_centroid_label() {
        let model = ClusterModel {
            scaler: ScalerParams {
                mean: [60.0, 4.0, 800.0],
                std_dev: [30.0, 2.0, 500.0],
            },
            centroids: [
                [-1.5, 1.0, 1.5],
                [1.0, -1.0, -1.4],
                [0.0, 0.0, 0.0],
                [-0.5, -0.5, -0.8],
            ],
            centroid_labels: [
                RegularSegment::Premium,
                RegularSegment::Lapsed,
                RegularSegment::Regular,
                RegularSegment::Occasional,
            ],
        };

        // scales to [1.0, -1.0, -1.5]
        let lapsed = profile(90, 2, 50.0);
        assert_eq!(predict(&lapsed, &model).unwrap(), RegularSegment::Lapsed);
    }

    #[test]
    fn test_equidistant_point_takes_lowest_index() {
        let model = unit_model(RegularSegment::ALL);

        // Equidistant from centroids 1 and 2, further from 0 and 3
        assert_eq!(model.nearest_centroid(&[2.0, 2.0, 0.0]), 1);
        // Equidistant from centroids 0 and 1
        assert_eq!(model.nearest_centroid(&[1.0, 0.0, 0.0]), 0);
    }

    #[test]
    fn test_predict_rejects_degenerate_model() {
        let mut model = unit_model(RegularSegment::ALL);
        model.scaler.std_dev[2] = 0.0;

        assert_eq!(
            predict(&profile(1, 1, 1.0), &model),
            Err(SegmentError::DegenerateFeature {
                feature: Feature::Monetary
            })
        );
    }

    #[test]
    fn test_validate_requires_every_label() {
        let model = unit_model([
            RegularSegment::Regular,
            RegularSegment::Regular,
            RegularSegment::Occasional,
            RegularSegment::Premium,
        ]);

        assert!(matches!(
            model.validate(),
            Err(SegmentError::InvalidModel { .. })
        ));
    }

    #[test]
    fn test_label_centroids_by_rank() {
        // [recency, frequency, monetary]
        let centroids = [
            [1.5, 0.0, -1.2],  // oldest, poorest
            [-0.2, 0.0, 0.3],  // middle, higher spend
            [-1.4, 0.0, 1.6],  // newest, richest
            [0.1, 0.0, -0.7],  // middle, lower spend
        ];

        assert_eq!(
            label_centroids(&centroids),
            [
                RegularSegment::Lapsed,
                RegularSegment::Regular,
                RegularSegment::Premium,
                RegularSegment::Occasional,
            ]
        );
    }

    #[test]
    fn test_label_centroids_ties_go_to_lower_index() {
        let centroids = [[0.0; N_FEATURES]; N_CLUSTERS];

        // Rank sums fall back to index order: 0, 2, 4, 6
        assert_eq!(
            label_centroids(&centroids),
            [
                RegularSegment::Premium,
                RegularSegment::Regular,
                RegularSegment::Occasional,
                RegularSegment::Lapsed,
            ]
        );
    }

    #[test]
    fn test_silhouette_in_range() {
        let report = fit_with_report(&training_profiles(), &KMeansParams::default()).unwrap();

        let score = report.silhouette_sample(100);
        assert!(score > 0.5 && score <= 1.0, "silhouette {score}");
    }
}
