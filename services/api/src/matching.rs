use crate::infra::{
    seed_registry, InMemoryDonorRepository, InMemoryMatchRepository, RegistryService,
};
use clap::Args;
use medibytes::config::AppConfig;
use medibytes::error::AppError;
use medibytes::matching::{
    BloodType, CompatibilityEngine, CompatibilityResult, DonorProfile, OrganType,
    RecipientProfile, Reported,
};
use medibytes::registry::{DonorCsvImporter, DonorSearchFilters, ScoredDonor};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Donor CSV export (donor_id,blood_type,age,organ_type,tissue_type,clearance_cid)
    #[arg(long)]
    pub(crate) donors_csv: PathBuf,
    /// Organ the recipient needs
    #[arg(long)]
    pub(crate) organ: OrganType,
    /// Recipient blood type; restricts results to donors who can give to it
    #[arg(long)]
    pub(crate) blood_type: Option<BloodType>,
    /// Recipient age in years
    #[arg(long)]
    pub(crate) age: Option<u32>,
    /// Recipient HLA antigens, comma separated
    #[arg(long)]
    pub(crate) tissue_type: Option<String>,
    /// Recipient urgency on a 0-100 scale
    #[arg(long)]
    pub(crate) urgency: Option<f64>,
    /// Youngest donor age to consider
    #[arg(long)]
    pub(crate) min_age: Option<u32>,
    /// Oldest donor age to consider
    #[arg(long)]
    pub(crate) max_age: Option<u32>,
    /// Maximum number of donors to list (1-100)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    #[arg(long)]
    pub(crate) donor_blood_type: BloodType,
    #[arg(long)]
    pub(crate) donor_age: u32,
    #[arg(long)]
    pub(crate) donor_tissue_type: Option<String>,
    #[arg(long)]
    pub(crate) recipient_blood_type: Option<BloodType>,
    #[arg(long)]
    pub(crate) recipient_age: Option<u32>,
    #[arg(long)]
    pub(crate) recipient_tissue_type: Option<String>,
    /// Recipient urgency on a 0-100 scale
    #[arg(long)]
    pub(crate) urgency: Option<f64>,
    /// Print the result as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = RegistryService::new(
        Arc::new(InMemoryDonorRepository::default()),
        Arc::new(InMemoryMatchRepository::default()),
        config.matching,
    );

    let registrations = DonorCsvImporter::from_path(&args.donors_csv)?;
    let summary = seed_registry(&service, registrations);
    println!(
        "Loaded {} donors from {} ({} rows skipped)",
        summary.registered,
        args.donors_csv.display(),
        summary.skipped
    );

    let filters = rank_filters(&args);
    let results = service.search(&filters)?;
    render_ranking(args.organ, &results);
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = CompatibilityEngine::new(config.matching.weights);

    let (donor, recipient) = score_profiles(&args);
    let result = engine.score(&donor, recipient.as_ref());

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Result unavailable as JSON: {err}"),
        }
    } else {
        render_result(&result);
    }
    Ok(())
}

fn rank_filters(args: &RankArgs) -> DonorSearchFilters {
    DonorSearchFilters {
        blood_type: args.blood_type.map(Reported::Known),
        min_age: args.min_age,
        max_age: args.max_age,
        tissue_type: args.tissue_type.clone(),
        recipient_age: args.age,
        urgency_score: args.urgency,
        limit: args.limit,
        ..DonorSearchFilters::for_organ(args.organ)
    }
}

fn score_profiles(args: &ScoreArgs) -> (DonorProfile, Option<RecipientProfile>) {
    let mut donor = DonorProfile::new(args.donor_blood_type, args.donor_age);
    donor.tissue_type = args.donor_tissue_type.clone();

    let recipient = RecipientProfile {
        blood_type: args.recipient_blood_type.map(Reported::Known),
        age: args.recipient_age,
        tissue_type: args.recipient_tissue_type.clone(),
        organ_needed: None,
        urgency_score: args.urgency,
    };
    let recipient = (recipient != RecipientProfile::default()).then_some(recipient);

    (donor, recipient)
}

fn render_ranking(organ: OrganType, results: &[ScoredDonor]) {
    if results.is_empty() {
        println!("No eligible {organ} donors found");
        return;
    }

    println!("Ranked {organ} donors:");
    for (position, hit) in results.iter().enumerate() {
        println!(
            "{:>3}. {:<12} {:<4} age {:<3} score {:>6.2}  {}",
            position + 1,
            hit.donor.donor_id.0,
            hit.donor.blood_type,
            hit.donor
                .age
                .map(|age| age.to_string())
                .unwrap_or_else(|| "-".to_string()),
            hit.compatibility.score,
            hit.compatibility.recommendation
        );
    }
}

fn render_result(result: &CompatibilityResult) {
    println!("Compatibility score: {:.2}", result.score);
    println!("Recommendation: {}", result.recommendation);
    println!("Factors:");
    println!("  - blood type match:  {:>6.2}", result.factors.blood_type_match);
    println!("  - tissue match:      {:>6.2}", result.factors.tissue_match);
    println!("  - age compatibility: {:>6.2}", result.factors.age_compatibility);
    println!("  - urgency factor:    {:>6.2}", result.factors.urgency_factor);
}
