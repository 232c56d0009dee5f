use anyhow::Result;

use crate::{
    cli::{Cli, ReportArgs},
    matching::{Matcher, MatcherConfig},
    report::MatchReport,
};

pub fn run(cli: &Cli, args: &ReportArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or("./ward-mapping-debug.json".into());

    let dataset = super::load_dataset(&args.boundaries, &args.wards)?;

    let config = MatcherConfig {
        threshold: args.threshold.unwrap_or(MatcherConfig::default().threshold),
        token_fallback: args.token_fallback,
    };
    println!("[report] matching with fuzzy threshold {}", config.threshold);
    let matches = Matcher::new(config).run(&dataset.features, &dataset.records);

    let report = MatchReport::build(&dataset, &matches);
    println!(
        "[report] {} of {} features matched ({} unique wards of {})",
        report.stats.matched_features,
        report.stats.total_features,
        report.stats.unique_wards_mapped,
        report.stats.total_ward_data
    );
    if cli.verbose > 0 {
        for entry in report.mappings.iter().filter(|e| e.matched_ward_id.is_none()) {
            eprintln!(
                "[report] unmatched feature {} ({:?} / {:?})",
                entry.feature_index, entry.ward_name, entry.ward_no
            );
        }
    }

    println!("[report] writing report to {}", out_path.display());
    report.write_to(&out_path)?;

    Ok(())
}
