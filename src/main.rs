//! rfmseg: trains the segmentation model from transactions, or classifies one customer
//!
//! Training mode loads a transactions CSV, derives RFM profiles, computes the
//! outlier bounds, fits the cluster model and writes the artifact. Prediction
//! mode loads the artifact and classifies a single R,F,M triple.

use anyhow::{Context, Result};
use clap::Parser;
use rfmseg::{data, pipeline, Args, CustomerProfile, SegmentationArtifact};
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(profile) = args.parse_rfm_values()? {
        run_prediction_mode(&args, &profile)
    } else {
        run_training_pipeline(&args)
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Classify a single customer with a previously trained artifact
fn run_prediction_mode(args: &Args, profile: &CustomerProfile) -> Result<()> {
    println!("=== Prediction Mode ===");
    println!(
        "Input RFM values: R={}, F={}, M={:.2}",
        profile.recency, profile.frequency, profile.monetary
    );

    let artifact = SegmentationArtifact::load(&args.model)
        .with_context(|| format!("loading model artifact {}", args.model.display()))?;
    log::debug!("loaded artifact version {}", artifact.version);
    let segmenter = artifact.into_segmenter();

    let segmentation = segmenter.classify(profile)?;

    println!("\n✓ Segment: {}", segmentation.label);
    println!("  {}", segmentation.insight);

    if args.verbose {
        let thresholds = segmenter.thresholds();
        if thresholds.is_disabled() {
            println!("\nOutlier detection disabled for this model");
        } else {
            println!(
                "\nOutlier bounds: frequency > {:.2}, monetary > {:.2}",
                thresholds.frequency_upper_bound, thresholds.monetary_upper_bound
            );
        }
    }

    Ok(())
}

/// Run the full training pipeline and write the artifact
fn run_training_pipeline(args: &Args) -> Result<()> {
    println!("=== Training Pipeline ===\n");

    let start_time = Instant::now();
    let config = args.resolve_config()?;
    let reference_time = args.reference_time()?;
    log::debug!("reference time {reference_time}, config {config:?}");

    let transactions = data::load_transactions(&args.input)
        .with_context(|| format!("loading transactions from {}", args.input.display()))?;
    println!("✓ Data loaded: {} transactions", transactions.len());

    let report = pipeline::train(&transactions, reference_time, &config)?;
    println!(
        "✓ Profiles: {} customers ({} regular, {} outliers)",
        report.profiles.len(),
        report.regular_count(),
        report.outlier_count
    );
    match &report.thresholds {
        Some(thresholds) => println!(
            "  Outlier bounds: frequency > {:.2}, monetary > {:.2}",
            thresholds.frequency_upper_bound, thresholds.monetary_upper_bound
        ),
        None => println!("  Too few customers for outlier bounds; all treated as regular"),
    }

    println!("\n=== Cluster Statistics ===");
    let fit = &report.fit;
    let cluster_sizes = fit.cluster_sizes();
    for (cluster, &size) in cluster_sizes.iter().enumerate() {
        let percentage = (size as f64 / fit.assignments.len() as f64) * 100.0;
        let centroid = fit.model.centroids[cluster];
        println!(
            "Cluster {} ({}): {} customers ({:.1}%), centroid R={:.2} F={:.2} M={:.2}",
            cluster,
            fit.model.centroid_labels[cluster],
            size,
            percentage,
            centroid[0],
            centroid[1],
            centroid[2]
        );
    }

    let silhouette_score = fit.silhouette_sample(100);
    println!("\nSilhouette score (sample): {silhouette_score:.3}");
    println!("Within-cluster sum of squares: {:.2}", fit.inertia);
    if args.verbose {
        println!(
            "Iterations: {} ({})",
            fit.iterations,
            if fit.converged { "converged" } else { "iteration cap" }
        );
    }

    println!("\n=== Segment Counts ===");
    for (label, count) in &report.label_counts {
        println!("{label:<14} {count}");
    }

    report
        .to_artifact()
        .save(&args.model)
        .with_context(|| format!("writing model artifact {}", args.model.display()))?;

    println!("\n=== Pipeline Complete ===");
    println!(
        "Total processing time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    println!("Model saved to: {}", args.model.display());

    Ok(())
}
