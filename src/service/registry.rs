//! Watch-list loading from the registry CSV.
//!
//! Headers are matched case-insensitively against a few accepted
//! spellings, so exports from different tools load without editing.

use crate::model::company::parse_locations;
use crate::model::CompanyRecord;
use crate::service::lexicon::Lexicons;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

const NAME_HEADERS: &[&str] = &["company", "company name", "name"];
const WEBSITE_HEADERS: &[&str] = &["website", "domain", "url", "site"];
const LOCATION_HEADERS: &[&str] = &["locations", "location", "chapters", "markets"];

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Failed to read company CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse company CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("No company name column found in {0}")]
    MissingNameColumn(String),
}

/// Load and filter the company watch list.
///
/// Rows with implausible names are skipped: empty, two characters or
/// fewer, purely numeric, bare initials, or a generic single word.
pub fn load_companies(
    path: impl AsRef<Path>,
    lexicons: &Lexicons,
) -> Result<Vec<CompanyRecord>, RegistryError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let name_idx = find_column(&headers, NAME_HEADERS)
        .ok_or_else(|| RegistryError::MissingNameColumn(path.display().to_string()))?;
    let website_idx = find_column(&headers, WEBSITE_HEADERS);
    let location_idx = find_column(&headers, LOCATION_HEADERS);

    let mut companies = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        let name = record.get(name_idx).unwrap_or("").trim();
        if !is_plausible_name(name, lexicons) {
            skipped += 1;
            continue;
        }

        let mut company = CompanyRecord::new(name);
        if let Some(idx) = website_idx {
            company.domains = parse_domains(record.get(idx).unwrap_or(""));
        }
        if let Some(idx) = location_idx {
            company.locations = parse_locations(record.get(idx).unwrap_or(""));
        }
        companies.push(company);
    }

    tracing::info!(
        path = %path.display(),
        loaded = companies.len(),
        skipped,
        "Loaded company watch list"
    );
    Ok(companies)
}

fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| candidates.contains(&h.trim().to_lowercase().as_str()))
}

fn initials_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]\s*[A-Z]\s*[A-Z]?$").unwrap())
}

fn is_plausible_name(name: &str, lexicons: &Lexicons) -> bool {
    if name.len() <= 2 {
        return false;
    }
    let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if initials_re().is_match(name) {
        return false;
    }
    if !name.contains(' ') && lexicons.is_generic(name) {
        return false;
    }
    true
}

/// Split a website cell into normalized bare domains, order kept, no duplicates
fn parse_domains(raw: &str) -> Vec<String> {
    let mut domains = Vec::new();
    for part in raw.split([';', ',']) {
        if let Some(domain) = normalize_domain(part) {
            if !domains.contains(&domain) {
                domains.push(domain);
            }
        }
    }
    domains
}

fn normalize_domain(raw: &str) -> Option<String> {
    let mut domain = raw.trim().to_lowercase();
    for prefix in ["https://", "http://"] {
        if let Some(stripped) = domain.strip_prefix(prefix) {
            domain = stripped.to_string();
        }
    }
    if let Some(stripped) = domain.strip_prefix("www.") {
        domain = stripped.to_string();
    }
    let domain = domain.split('/').next().unwrap_or("").trim();
    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}
