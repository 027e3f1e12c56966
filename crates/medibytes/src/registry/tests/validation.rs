use super::common::*;
use chrono::NaiveDate;

use crate::matching::{BloodType, OrganList, OrganType, Reported};
use crate::registry::domain::{DonorId, DonorRecord, DonorSearchFilters};
use crate::registry::validation::{record_from_registration, search_plan, ValidationError};
use crate::registry::MatchingConfig;

fn registered_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
}

fn record(donor_id: &str, blood_type: BloodType, age: u32) -> DonorRecord {
    record_from_registration(registration(donor_id, blood_type, age), registered_on())
        .expect("valid registration")
}

#[test]
fn registration_becomes_active_record() {
    let record = record("P-1", BloodType::APositive, 44);

    assert!(record.is_active);
    assert_eq!(record.registered_on, registered_on());
    assert_eq!(
        record.profile.blood_type,
        Some(Reported::Known(BloodType::APositive))
    );
    assert_eq!(record.profile.age, Some(44));
    assert!(record.profile.organ_type.offers(OrganType::Kidney));
    assert_eq!(record.clearance_cid, "bafy-P-1");
}

#[test]
fn registration_rejects_unknown_blood_type() {
    let mut registration = registration("P-2", BloodType::APositive, 40);
    registration.blood_type = Reported::Unrecognized("C+".to_string());

    assert_eq!(
        record_from_registration(registration, registered_on()),
        Err(ValidationError::InvalidBloodType("C+".to_string()))
    );
}

#[test]
fn registration_rejects_unknown_or_missing_organs() {
    let mut unknown = registration("P-3", BloodType::APositive, 40);
    unknown.organ_type = OrganList::parse("kidney,spleen");
    assert_eq!(
        record_from_registration(unknown, registered_on()),
        Err(ValidationError::UnknownOrgan("spleen".to_string()))
    );

    let mut empty = registration("P-4", BloodType::APositive, 40);
    empty.organ_type = OrganList::parse(" , ");
    assert_eq!(
        record_from_registration(empty, registered_on()),
        Err(ValidationError::MissingOrgan)
    );
}

#[test]
fn registration_enforces_age_bounds_inclusively() {
    for (donor_id, age) in [("P-5", 18), ("P-6", 75)] {
        let registration = registration(donor_id, BloodType::ONegative, age);
        assert!(record_from_registration(registration, registered_on()).is_ok());
    }

    for (donor_id, age) in [("P-7", 17), ("P-8", 76)] {
        let registration = registration(donor_id, BloodType::ONegative, age);
        assert_eq!(
            record_from_registration(registration, registered_on()),
            Err(ValidationError::AgeOutOfRange(age))
        );
    }
}

#[test]
fn registration_requires_clearance_and_donor_id() {
    let mut no_clearance = registration("P-9", BloodType::BPositive, 30);
    no_clearance.clearance_cid = "   ".to_string();
    assert_eq!(
        record_from_registration(no_clearance, registered_on()),
        Err(ValidationError::MissingClearance)
    );

    let mut no_id = registration("P-10", BloodType::BPositive, 30);
    no_id.donor_id = DonorId(String::new());
    assert_eq!(
        record_from_registration(no_id, registered_on()),
        Err(ValidationError::MissingDonorId)
    );
}

#[test]
fn search_plan_expands_blood_type_to_compatible_donors() {
    let mut filters = DonorSearchFilters::for_organ(OrganType::Kidney);
    filters.blood_type = Some(Reported::Known(BloodType::APositive));
    let plan = search_plan(&filters, &MatchingConfig::default()).expect("valid filters");

    assert!(plan.admits(&record("P-11", BloodType::ONegative, 40)));
    assert!(plan.admits(&record("P-12", BloodType::ANegative, 40)));
    assert!(!plan.admits(&record("P-13", BloodType::BPositive, 40)));
    assert!(!plan.admits(&record("P-14", BloodType::AbPositive, 40)));
}

#[test]
fn search_plan_applies_inclusive_age_range_and_exact_tissue() {
    let mut filters = DonorSearchFilters::for_organ(OrganType::Kidney);
    filters.min_age = Some(30);
    filters.max_age = Some(50);
    filters.tissue_type = Some("A*02:01".to_string());
    let plan = search_plan(&filters, &MatchingConfig::default()).expect("valid filters");

    assert!(plan.admits(&record("P-15", BloodType::OPositive, 30)));
    assert!(plan.admits(&record("P-16", BloodType::OPositive, 50)));
    assert!(!plan.admits(&record("P-17", BloodType::OPositive, 51)));

    let mut other_tissue = record("P-18", BloodType::OPositive, 40);
    other_tissue.profile.tissue_type = Some("B*07:02".to_string());
    assert!(!plan.admits(&other_tissue));
}

#[test]
fn tissue_filter_ignores_antigen_spacing() {
    let mut filters = DonorSearchFilters::for_organ(OrganType::Kidney);
    filters.tissue_type = Some("A*02:01,B*07:02".to_string());
    let plan = search_plan(&filters, &MatchingConfig::default()).expect("valid filters");

    let mut spaced = record("P-30", BloodType::OPositive, 40);
    spaced.profile.tissue_type = Some("A*02:01, B*07:02".to_string());
    assert!(plan.admits(&spaced));

    let mut partial = record("P-31", BloodType::OPositive, 40);
    partial.profile.tissue_type = Some("A*02:01".to_string());
    assert!(!plan.admits(&partial));

    let mut untyped = record("P-32", BloodType::OPositive, 40);
    untyped.profile.tissue_type = None;
    assert!(!plan.admits(&untyped));
}

#[test]
fn search_plan_skips_inactive_donors_and_other_organs() {
    let plan = search_plan(
        &DonorSearchFilters::for_organ(OrganType::Liver),
        &MatchingConfig::default(),
    )
    .expect("valid filters");

    let mut liver = record("P-19", BloodType::OPositive, 40);
    liver.profile.organ_type = OrganList::new([OrganType::Liver]);
    assert!(plan.admits(&liver));

    liver.is_active = false;
    assert!(!plan.admits(&liver));
    assert!(!plan.admits(&record("P-20", BloodType::OPositive, 40)));
}

#[test]
fn search_plan_validates_limit_and_ranges() {
    let config = MatchingConfig::default();

    let plan = search_plan(&DonorSearchFilters::for_organ(OrganType::Heart), &config)
        .expect("default limit");
    assert_eq!(plan.limit, MatchingConfig::DEFAULT_SEARCH_LIMIT);

    let mut filters = DonorSearchFilters::for_organ(OrganType::Heart);
    filters.limit = Some(0);
    assert!(matches!(
        search_plan(&filters, &config),
        Err(ValidationError::InvalidLimit(0))
    ));
    filters.limit = Some(101);
    assert!(matches!(
        search_plan(&filters, &config),
        Err(ValidationError::InvalidLimit(101))
    ));

    let mut inverted = DonorSearchFilters::for_organ(OrganType::Heart);
    inverted.min_age = Some(60);
    inverted.max_age = Some(20);
    assert!(matches!(
        search_plan(&inverted, &config),
        Err(ValidationError::InvalidAgeRange { min: 60, max: 20 })
    ));

    let mut unknown_organ = DonorSearchFilters::for_organ(OrganType::Heart);
    unknown_organ.organ_type = Reported::Unrecognized("spleen".to_string());
    assert!(matches!(
        search_plan(&unknown_organ, &config),
        Err(ValidationError::UnknownOrgan(_))
    ));
}
