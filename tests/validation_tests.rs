//! Tests for field validation and formatting
//!
//! These tests verify:
//! - Offer-details rules (required fields, age window, income floor)
//! - Contact rules (required fields, email shape, phone length)
//! - Phone and currency formatting as typed

use chrono::{Months, NaiveDate};
use leadform::validation::{
    format_budget, parse_monthly_income, validate_location, validate_offer_details_on,
};
use leadform::{
    FormField, IncomeSource, Location, OfferDetails, ResidenceType, format_currency,
    format_phone_number,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
}

fn years_ago(years: u32) -> String {
    (today() - Months::new(years * 12)).format("%Y-%m-%d").to_string()
}

fn complete_details() -> OfferDetails {
    OfferDetails {
        birth_date: "1985-04-12".to_string(),
        residence_type: Some(ResidenceType::Own),
        residence_years: "4".to_string(),
        residence_months: String::new(),
        income_source: Some(IncomeSource::Employment),
        income_years: String::new(),
        income_months: "8".to_string(),
        monthly_income: "$3,500".to_string(),
    }
}

fn complete_location() -> Location {
    Location {
        address: "1 Main St".to_string(),
        email: "ada@example.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        phone: "(416) 555-1234".to_string(),
    }
}

// =============================================================================
// Offer details
// =============================================================================

#[test]
fn test_empty_offer_details_has_six_errors() {
    let report = validate_offer_details_on(&OfferDetails::default(), today());
    assert!(!report.is_valid());
    let fields: Vec<FormField> = report.fields().collect();
    assert_eq!(
        fields,
        vec![
            FormField::BirthDate,
            FormField::ResidenceType,
            FormField::ResidenceYears,
            FormField::IncomeSource,
            FormField::IncomeYears,
            FormField::MonthlyIncome,
        ]
    );
}

#[test]
fn test_complete_offer_details_pass() {
    assert!(validate_offer_details_on(&complete_details(), today()).is_valid());
}

#[test]
fn test_age_boundary_at_eighteen() {
    let mut details = complete_details();

    details.birth_date = years_ago(17);
    let report = validate_offer_details_on(&details, today());
    assert_eq!(report.get(FormField::BirthDate), Some("Must be at least 18 years old"));

    details.birth_date = years_ago(18);
    let report = validate_offer_details_on(&details, today());
    assert_eq!(report.get(FormField::BirthDate), None);
}

#[test]
fn test_age_boundary_at_one_hundred() {
    let mut details = complete_details();

    details.birth_date = years_ago(100);
    assert!(validate_offer_details_on(&details, today()).is_valid());

    details.birth_date = years_ago(101);
    let report = validate_offer_details_on(&details, today());
    assert_eq!(report.get(FormField::BirthDate), Some("Please enter a valid birth date"));
}

#[test]
fn test_unparseable_birth_date() {
    let details = OfferDetails {
        birth_date: "1990-13-40".to_string(),
        ..complete_details()
    };
    let report = validate_offer_details_on(&details, today());
    assert_eq!(report.get(FormField::BirthDate), Some("Please enter a valid birth date"));
}

#[test]
fn test_monthly_income_rules() {
    assert_eq!(parse_monthly_income("$1,234"), Some(1234));

    let check = |income: &str| {
        let details = OfferDetails {
            monthly_income: income.to_string(),
            ..complete_details()
        };
        validate_offer_details_on(&details, today())
            .get(FormField::MonthlyIncome)
            .map(str::to_string)
    };

    assert_eq!(check("$1,234"), None);
    assert_eq!(check("$50"), Some("Please enter a valid monthly income".to_string()));
    assert_eq!(check(""), Some("Monthly income is required".to_string()));
    assert_eq!(check("$100"), None);
}

#[test]
fn test_years_or_months_is_enough() {
    let details = OfferDetails {
        residence_years: String::new(),
        residence_months: "6".to_string(),
        income_years: "1".to_string(),
        income_months: String::new(),
        ..complete_details()
    };
    assert!(validate_offer_details_on(&details, today()).is_valid());
}

// =============================================================================
// Contact details
// =============================================================================

#[test]
fn test_empty_location_has_five_errors() {
    let report = validate_location(&Location::default());
    assert_eq!(report.len(), 5);
    assert_eq!(report.get(FormField::Address), Some("Address is required"));
    assert_eq!(report.get(FormField::Email), Some("Email is required"));
}

#[test]
fn test_complete_location_passes() {
    assert!(validate_location(&complete_location()).is_valid());
}

#[test]
fn test_whitespace_only_fields_are_missing() {
    let location = Location {
        first_name: "   ".to_string(),
        ..complete_location()
    };
    let report = validate_location(&location);
    assert_eq!(report.fields().collect::<Vec<_>>(), vec![FormField::FirstName]);
}

#[test]
fn test_email_shape() {
    let location = Location {
        email: "ada.example.com".to_string(),
        ..complete_location()
    };
    assert_eq!(
        validate_location(&location).get(FormField::Email),
        Some("Please enter a valid email address")
    );
}

#[test]
fn test_short_phone_rejected() {
    let location = Location {
        phone: format_phone_number("416555123"),
        ..complete_location()
    };
    assert!(validate_location(&location).get(FormField::Phone).is_some());
}

// =============================================================================
// Formatting
// =============================================================================

#[test]
fn test_phone_formatting() {
    assert_eq!(format_phone_number("4165551234"), "(416) 555-1234");
    assert_eq!(format_phone_number("416"), "416");
    assert_eq!(format_phone_number("41655"), "(416) 55");
    assert_eq!(format_phone_number("416-555-12345678"), "(416) 555-1234");
    assert_eq!(format_phone_number(""), "");
}

#[test]
fn test_currency_formatting() {
    assert_eq!(format_currency("1234"), "$1,234");
    assert_eq!(format_currency("$1,234,567"), "$1,234,567");
    assert_eq!(format_currency("abc"), "");
    assert_eq!(format_currency(""), "");
    assert_eq!(format_budget(400), "$400");
}
