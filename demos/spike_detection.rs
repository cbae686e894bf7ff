//! ChangeFinder example.
//!
//! Run with: cargo run --example spike_detection

use changefinder::prelude::*;

fn main() -> Result<()> {
    println!("=== ChangeFinder Example ===\n");

    // Flat noise with a single spike and a level shift
    let n = 200;
    let mut series: Vec<f64> = (0..n)
        .map(|i| 10.0 + 0.5 * (i as f64 * 0.7).sin() + 0.2 * (i as f64 * 1.3).cos())
        .collect();
    series[60] = 25.0;
    for x in series.iter_mut().skip(120) {
        *x += 8.0;
    }

    println!("Generated: {} observations, spike at 60, level shift at 120\n", n);

    for (ar_method, score_method) in [
        (ArMethod::YuleWalker, ScoreMethod::LogLoss),
        (ArMethod::Burg, ScoreMethod::Hellinger),
    ] {
        let config = ChangeFinderConfig::new(0.05, 2, 7, 7)
            .ar_method(ar_method)
            .score_method(score_method);
        let result = changefinder_detect(&series, &config)?;

        let top = |scores: &[f64]| {
            (20..scores.len())
                .max_by(|&a, &b| scores[a].total_cmp(&scores[b]))
                .unwrap_or(0)
        };
        let peak_outlier = top(&result.outlier_scores);
        let peak_change = top(&result.change_scores);

        println!("--- {} / {} ---", ar_method.name(), score_method.name());
        println!(
            "Highest outlier score: {:.4} at index {}",
            result.outlier_scores[peak_outlier], peak_outlier
        );
        println!(
            "Highest change score:  {:.4} at index {}\n",
            result.change_scores[peak_change], peak_change
        );
    }

    Ok(())
}
