//! Field validation and input formatting
//!
//! Every rule runs independently and the results are aggregated into a
//! [`ValidationReport`], so the UI can mark all offending fields at once.
//! Validators are pure: the offer-details rules take "today" as a parameter
//! and [`validate_offer_details`] simply supplies the local date.

use crate::error::{LeadFormError, Result};
use crate::session::{Location, OfferDetails};
use crate::types::FormField;
use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Youngest accepted applicant, in whole years.
pub const MIN_AGE: i32 = 18;

/// Oldest plausible applicant, in whole years.
pub const MAX_AGE: i32 = 100;

/// Smallest accepted monthly income, in dollars.
pub const MIN_MONTHLY_INCOME: u64 = 100;

/// Digits in a valid phone number.
pub const PHONE_DIGITS: usize = 10;

/// Shown when the offer submission fails for any reason.
pub const SUBMIT_ERROR_MESSAGE: &str =
    "There was an error submitting your application. Please try again.";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is a valid regex"));

/// Outcome of validating one step: field name to human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: BTreeMap<FormField, String>,
}

impl ValidationReport {
    /// Empty report (valid).
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no rule failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record a failure. A later message for the same field replaces the earlier one.
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// Drop the message for a field, e.g. when the user edits it.
    pub fn clear(&mut self, field: FormField) {
        self.errors.remove(&field);
    }

    /// Message for a field, if it failed.
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failing fields in field order.
    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.errors.keys().copied()
    }

    /// All failures in field order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
    }

    /// `Ok` when valid, otherwise a [`LeadFormError::Validation`] naming the
    /// failing fields.
    pub fn ensure_valid(&self) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        let fields: Vec<String> = self.fields().map(|f| f.to_string()).collect();
        Err(LeadFormError::validation(format!(
            "{} invalid field(s): {}",
            fields.len(),
            fields.join(", ")
        )))
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Keep only ASCII digits.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Format a phone number progressively as the user types.
///
/// `"416"` stays `"416"`, `"41655"` becomes `"(416) 55"`, and ten or more
/// digits become `"(416) 555-1234"` (extra digits are dropped).
pub fn format_phone_number(value: &str) -> String {
    let digits = digits_only(value);
    let len = digits.len();
    if len < 4 {
        return digits;
    }
    if len < 7 {
        return format!("({}) {}", &digits[..3], &digits[3..]);
    }
    format!(
        "({}) {}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..len.min(PHONE_DIGITS)]
    )
}

/// Format free text as a whole-dollar amount: `"1234"` becomes `"$1,234"`.
///
/// Returns an empty string when there are no digits at all.
pub fn format_currency(value: &str) -> String {
    let digits = digits_only(value);
    if digits.is_empty() {
        return String::new();
    }
    let significant = digits.trim_start_matches('0');
    let significant = if significant.is_empty() { "0" } else { significant };
    format!("${}", group_thousands(significant))
}

/// Budget slider display: `400` becomes `"$400"`.
pub fn format_budget(amount: u32) -> String {
    format!("${}", group_thousands(&amount.to_string()))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ============================================================================
// Offer details
// ============================================================================

/// Parse a `YYYY-MM-DD` birth date.
pub fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Age in whole calendar years on `today`. Negative for dates in the future.
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years
}

/// Parse a monthly income after stripping everything but digits.
///
/// Returns `None` when no digits remain. A value too large for `u64` is
/// reported as `u64::MAX`.
pub fn parse_monthly_income(value: &str) -> Option<u64> {
    let digits = digits_only(value);
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Validate the offer-details step against the local date.
pub fn validate_offer_details(details: &OfferDetails) -> ValidationReport {
    validate_offer_details_on(details, Local::now().date_naive())
}

/// Validate the offer-details step as of `today`.
pub fn validate_offer_details_on(details: &OfferDetails, today: NaiveDate) -> ValidationReport {
    let mut report = ValidationReport::new();

    if details.birth_date.is_empty() {
        report.insert(FormField::BirthDate, "Birth date is required");
    } else {
        match parse_birth_date(&details.birth_date).map(|b| age_in_years(b, today)) {
            Some(age) if age < MIN_AGE => {
                report.insert(FormField::BirthDate, "Must be at least 18 years old");
            }
            Some(age) if age > MAX_AGE => {
                report.insert(FormField::BirthDate, "Please enter a valid birth date");
            }
            Some(_) => {}
            None => report.insert(FormField::BirthDate, "Please enter a valid birth date"),
        }
    }

    if details.residence_type.is_none() {
        report.insert(FormField::ResidenceType, "Please select if you rent or own");
    }

    if details.residence_years.is_empty() && details.residence_months.is_empty() {
        report.insert(
            FormField::ResidenceYears,
            "Please specify how long you have lived there",
        );
    }

    if details.income_source.is_none() {
        report.insert(FormField::IncomeSource, "Please select your income source");
    }

    if details.income_years.is_empty() && details.income_months.is_empty() {
        report.insert(
            FormField::IncomeYears,
            "Please specify how long you have received this income",
        );
    }

    if details.monthly_income.is_empty() {
        report.insert(FormField::MonthlyIncome, "Monthly income is required");
    } else if !parse_monthly_income(&details.monthly_income)
        .is_some_and(|income| income >= MIN_MONTHLY_INCOME)
    {
        report.insert(FormField::MonthlyIncome, "Please enter a valid monthly income");
    }

    report
}

// ============================================================================
// Contact details
// ============================================================================

/// Validate the contact (location) step.
pub fn validate_location(location: &Location) -> ValidationReport {
    let mut report = ValidationReport::new();

    if location.address.trim().is_empty() {
        report.insert(FormField::Address, "Address is required");
    }

    let email = location.email.trim();
    if email.is_empty() {
        report.insert(FormField::Email, "Email is required");
    } else if !EMAIL_PATTERN.is_match(email) {
        report.insert(FormField::Email, "Please enter a valid email address");
    }

    if location.first_name.trim().is_empty() {
        report.insert(FormField::FirstName, "First name is required");
    }

    if location.last_name.trim().is_empty() {
        report.insert(FormField::LastName, "Last name is required");
    }

    if location.phone.trim().is_empty() {
        report.insert(FormField::Phone, "Phone number is required");
    } else if digits_only(&location.phone).len() != PHONE_DIGITS {
        report.insert(FormField::Phone, "Please enter a valid phone number");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IncomeSource, ResidenceType};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn complete_offer_details() -> OfferDetails {
        OfferDetails {
            birth_date: "1990-04-02".to_string(),
            residence_type: Some(ResidenceType::Rent),
            residence_years: "3".to_string(),
            residence_months: String::new(),
            income_source: Some(IncomeSource::Employment),
            income_years: String::new(),
            income_months: "8".to_string(),
            monthly_income: "$4,200".to_string(),
        }
    }

    fn complete_location() -> Location {
        Location {
            address: "12 King St W".to_string(),
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            phone: "(416) 555-1234".to_string(),
        }
    }

    #[test]
    fn test_empty_offer_details_reports_six_errors() {
        let report = validate_offer_details_on(&OfferDetails::default(), today());
        assert!(!report.is_valid());
        assert_eq!(
            report.fields().collect::<Vec<_>>(),
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
    fn test_complete_offer_details_is_valid() {
        let report = validate_offer_details_on(&complete_offer_details(), today());
        assert!(report.is_valid(), "unexpected errors: {:?}", report);
    }

    #[test]
    fn test_age_boundaries() {
        let mut details = complete_offer_details();

        details.birth_date = "2008-06-16".to_string(); // turns 18 tomorrow
        let report = validate_offer_details_on(&details, today());
        assert_eq!(report.get(FormField::BirthDate), Some("Must be at least 18 years old"));

        details.birth_date = "2008-06-15".to_string();
        assert!(validate_offer_details_on(&details, today()).get(FormField::BirthDate).is_none());

        details.birth_date = "1926-06-15".to_string(); // exactly 100
        assert!(validate_offer_details_on(&details, today()).get(FormField::BirthDate).is_none());

        details.birth_date = "1925-06-15".to_string();
        assert_eq!(
            validate_offer_details_on(&details, today()).get(FormField::BirthDate),
            Some("Please enter a valid birth date")
        );
    }

    #[test]
    fn test_unparseable_birth_date() {
        let mut details = complete_offer_details();
        details.birth_date = "next tuesday".to_string();
        let report = validate_offer_details_on(&details, today());
        assert_eq!(report.get(FormField::BirthDate), Some("Please enter a valid birth date"));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_age_in_years_counts_whole_years() {
        let birth = NaiveDate::from_ymd_opt(2000, 12, 31).unwrap();
        assert_eq!(age_in_years(birth, NaiveDate::from_ymd_opt(2018, 12, 30).unwrap()), 17);
        assert_eq!(age_in_years(birth, NaiveDate::from_ymd_opt(2018, 12, 31).unwrap()), 18);
        assert!(age_in_years(birth, NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()) < 0);
    }

    #[test]
    fn test_duration_either_unit_is_enough() {
        let mut details = complete_offer_details();
        details.residence_years.clear();
        details.residence_months = "11".to_string();
        details.income_years = "2".to_string();
        details.income_months.clear();
        assert!(validate_offer_details_on(&details, today()).is_valid());

        details.residence_months.clear();
        let report = validate_offer_details_on(&details, today());
        assert_eq!(report.fields().collect::<Vec<_>>(), vec![FormField::ResidenceYears]);
    }

    #[test]
    fn test_monthly_income_rules() {
        let mut details = complete_offer_details();

        details.monthly_income = "$1,234".to_string();
        assert_eq!(parse_monthly_income(&details.monthly_income), Some(1234));
        assert!(validate_offer_details_on(&details, today()).is_valid());

        details.monthly_income = "$50".to_string();
        assert_eq!(
            validate_offer_details_on(&details, today()).get(FormField::MonthlyIncome),
            Some("Please enter a valid monthly income")
        );

        details.monthly_income = "$".to_string();
        assert_eq!(
            validate_offer_details_on(&details, today()).get(FormField::MonthlyIncome),
            Some("Please enter a valid monthly income")
        );

        details.monthly_income.clear();
        assert_eq!(
            validate_offer_details_on(&details, today()).get(FormField::MonthlyIncome),
            Some("Monthly income is required")
        );
    }

    #[test]
    fn test_huge_income_saturates() {
        assert_eq!(parse_monthly_income("99999999999999999999999"), Some(u64::MAX));
    }

    #[test]
    fn test_empty_location_reports_five_errors() {
        let report = validate_location(&Location::default());
        assert_eq!(report.len(), 5);
        assert_eq!(report.get(FormField::Email), Some("Email is required"));
        assert_eq!(report.get(FormField::Phone), Some("Phone number is required"));
    }

    #[test]
    fn test_whitespace_only_contact_fields_are_empty() {
        let mut location = complete_location();
        location.first_name = "   ".to_string();
        let report = validate_location(&location);
        assert_eq!(report.get(FormField::FirstName), Some("First name is required"));
    }

    #[test]
    fn test_email_pattern() {
        let mut location = complete_location();
        location.email = "jane@example".to_string();
        assert_eq!(
            validate_location(&location).get(FormField::Email),
            Some("Please enter a valid email address")
        );
        location.email = "a@b.c".to_string();
        assert!(validate_location(&location).is_valid());
    }

    #[test]
    fn test_phone_needs_ten_digits() {
        let mut location = complete_location();
        location.phone = "(416) 555-123".to_string();
        assert_eq!(
            validate_location(&location).get(FormField::Phone),
            Some("Please enter a valid phone number")
        );
        location.phone = "416.555.1234".to_string();
        assert!(validate_location(&location).is_valid());
    }

    #[test]
    fn test_format_phone_number_progressive() {
        assert_eq!(format_phone_number(""), "");
        assert_eq!(format_phone_number("416"), "416");
        assert_eq!(format_phone_number("4165"), "(416) 5");
        assert_eq!(format_phone_number("416555"), "(416) 555");
        assert_eq!(format_phone_number("4165551"), "(416) 555-1");
        assert_eq!(format_phone_number("4165551234"), "(416) 555-1234");
        assert_eq!(format_phone_number("41655512349999"), "(416) 555-1234");
        assert_eq!(format_phone_number("(416) 555-12"), "(416) 555-12");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(""), "");
        assert_eq!(format_currency("abc"), "");
        assert_eq!(format_currency("7"), "$7");
        assert_eq!(format_currency("1234"), "$1,234");
        assert_eq!(format_currency("$1,2345"), "$12,345");
        assert_eq!(format_currency("0042"), "$42");
        assert_eq!(format_currency("1000000"), "$1,000,000");
    }

    #[test]
    fn test_format_budget() {
        assert_eq!(format_budget(150), "$150");
        assert_eq!(format_budget(800), "$800");
        assert_eq!(format_budget(1500), "$1,500");
    }

    #[test]
    fn test_report_clear_and_merge() {
        let mut report = validate_location(&Location::default());
        report.clear(FormField::Address);
        assert!(report.get(FormField::Address).is_none());
        assert_eq!(report.len(), 4);

        let mut other = ValidationReport::new();
        other.insert(FormField::Submit, SUBMIT_ERROR_MESSAGE);
        report.merge(other);
        assert_eq!(report.len(), 5);
        assert_eq!(report.get(FormField::Submit), Some(SUBMIT_ERROR_MESSAGE));
    }

    #[test]
    fn test_ensure_valid_names_fields() {
        assert!(ValidationReport::new().ensure_valid().is_ok());

        let mut report = ValidationReport::new();
        report.insert(FormField::Email, "Email is required");
        report.insert(FormField::Phone, "Phone number is required");
        let err = report.ensure_valid().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: 2 invalid field(s): email, phone"
        );
    }
}
