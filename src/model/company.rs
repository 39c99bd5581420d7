use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use utoipa::ToSchema;

/// A watch-list company loaded from the registry CSV.
///
/// Field semantics:
/// - name: canonical company name used for matching and verification
/// - domains: normalized bare domains (no scheme, no www, no path)
/// - locations: chapters or offices, optionally with a member count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompanyRecord {
    pub name: String,
    pub domains: Vec<String>,
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub name: String,
    pub member_count: Option<u32>,
}

impl CompanyRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domains: Vec::new(),
            locations: Vec::new(),
        }
    }

    /// Location with the highest member count, ties kept in input order.
    pub fn primary_location(&self) -> Option<&Location> {
        let mut best: Option<&Location> = None;
        for location in &self.locations {
            match best {
                Some(current)
                    if location.member_count.unwrap_or(0) > current.member_count.unwrap_or(0) => {
                    best = Some(location);
                }
                None => best = Some(location),
                _ => {}
            }
        }
        best
    }
}

fn location_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*?)\s*\((\d+)\)\s*$").unwrap())
}

/// Parse a semicolon-separated location list.
///
/// Entries may carry a member count in parentheses, e.g. "Berlin (120); Austin".
pub fn parse_locations(raw: &str) -> Vec<Location> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match location_re().captures(entry) {
            Some(caps) => Location {
                name: caps[1].trim().to_string(),
                member_count: caps[2].parse().ok(),
            },
            None => Location {
                name: entry.to_string(),
                member_count: None,
            },
        })
        .collect()
}
