//! Curated word and pattern tables shared by the matcher, verifier,
//! tone analyzer, and heuristic disambiguator.
//!
//! All tables are injected through [`Lexicons`] so tests can substitute
//! smaller ones without touching process state.

use regex::Regex;
use std::collections::HashSet;

/// Terms too common to identify a company on their own
const GENERIC_TERMS: &[&str] = &[
    "the", "and", "or", "for", "with", "from", "about", "new", "old", "big", "small", "good",
    "bad", "high", "low", "fast", "slow", "hot", "cold", "open", "close", "start", "stop",
    "begin", "end", "first", "last", "next", "previous",
];

/// Single-word company names that collide with everyday nouns.
/// These never verify without domain evidence.
const HIGH_RISK_WORDS: &[&str] = &[
    "advance", "agency", "anchor", "beacon", "bolt", "bridge", "compass", "crew", "drive",
    "focus", "forward", "harbor", "house", "light", "motion", "pilot", "play", "prime", "pulse",
    "reach", "shift", "spark", "summit", "wave",
];

/// Evidence that the surrounding text is about business at all
const BUSINESS_CONTEXT_PATTERNS: &[&str] = &[
    r"\bcompany\b",
    r"\bcorporation\b",
    r"\binc\b",
    r"\bllc\b",
    r"\bltd\b",
    r"\bstartup\b",
    r"\btech\b",
    r"\bsoftware\b",
    r"\bplatform\b",
    r"\bservice\b",
    r"\bannounces\b",
    r"\blaunches\b",
    r"\braises\b",
    r"\bfunding\b",
    r"\bpartnership\b",
    r"\bmerger\b",
    r"\bacquisition\b",
    r"\bappoints\b",
    r"\bceo\b",
    r"\bcto\b",
    r"\bheadquarters\b",
    r"\boffice\b",
    r"\blocation\b",
    r"\bexpansion\b",
];

/// Evidence that the text is about something other than business:
/// sports, weather, politics, crime, health, entertainment, education.
const NON_BUSINESS_PATTERNS: &[&str] = &[
    r"\bteam\b",
    r"\bgame\b",
    r"\bseason\b",
    r"\bplayer\b",
    r"\bcoach\b",
    r"\bleague\b",
    r"\bfinals\b",
    r"\bchampionship\b",
    r"\bplayoff\b",
    r"\btournament\b",
    r"\bweather\b",
    r"\bstorm\b",
    r"\bforecast\b",
    r"\belection\b",
    r"\bsenate\b",
    r"\bparliament\b",
    r"\bcampaign\b",
    r"\bpolice\b",
    r"\barrest\b",
    r"\brobbery\b",
    r"\bhospital\b",
    r"\bpatient\b",
    r"\bvaccine\b",
    r"\bmovie\b",
    r"\bfilm\b",
    r"\balbum\b",
    r"\bconcert\b",
    r"\bschool\b",
    r"\buniversity\b",
    r"\bstudent\b",
];

const PERSON_TITLES: &[&str] = &["mr", "mrs", "ms", "dr", "professor", "prof", "sir", "madam"];

/// Capitalized two-to-four word shapes that read as a personal name
const PERSON_NAME_PATTERNS: &[&str] = &[
    r"^[A-Z][a-z]+\s+[A-Z][a-z]+$",
    r"^[A-Z][a-z]+\s+[A-Z][a-z]+\s+[A-Z][a-z]+$",
    r"^[A-Z][a-z]+\s+[A-Z][a-z]+\s+[A-Z][a-z]+\s+[A-Z][a-z]+$",
];

const POSITIVE_TONE_PATTERNS: &[&str] = &[
    r"\braise[sd]?\b",
    r"\bgains?\b",
    r"\bsurge[sd]?\b",
    r"\bjumps?\b",
    r"\brises?\b",
    r"\brose\b",
    r"\brecord\b",
    r"\bgrowth\b",
    r"\bgrow(?:s|ing)?\b",
    r"\bprofits?\b",
    r"\bprofitable\b",
    r"\bsuccess(?:ful)?\b",
    r"\bwins?\b",
    r"\bwon\b",
    r"\bawards?\b",
    r"\blaunch(?:es|ed)?\b",
    r"\bfunding\b",
    r"\bexpand(?:s|ed|ing)?\b",
    r"\bmilestone\b",
    r"\bbreakthrough\b",
    r"\bboost(?:s|ed)?\b",
    r"\bsoar(?:s|ed)?\b",
    r"\bstrong(?:er)?\b",
    r"\bmomentum\b",
];

const NEGATIVE_TONE_PATTERNS: &[&str] = &[
    r"\bfalls?\b",
    r"\bdrops?\b",
    r"\bdecline[sd]?\b",
    r"\bloss(?:es)?\b",
    r"\blayoffs?\b",
    r"\bcuts?\b",
    r"\bbreach(?:es|ed)?\b",
    r"\bhack(?:ed|ing)?\b",
    r"\blawsuits?\b",
    r"\bsue[sd]?\b",
    r"\bfine[sd]\b",
    r"\bpenalt(?:y|ies)\b",
    r"\bcrisis\b",
    r"\bscandals?\b",
    r"\bfraud\b",
    r"\bbankrupt(?:cy)?\b",
    r"\bshuts?\s+down\b",
    r"\brecalls?\b",
    r"\boutages?\b",
    r"\bdowngrade[sd]?\b",
    r"\bweak(?:er|ness)?\b",
    r"\bwarn(?:s|ed|ing)?\b",
    r"\bdelay(?:s|ed)?\b",
    r"\bcancel(?:s|ed|led)?\b",
];

const NEUTRAL_TONE_PATTERNS: &[&str] = &[
    r"\bappoint(?:s|ed)?\b",
    r"\bjoin(?:s|ed)?\b",
    r"\bannounce[sd]?\b",
    r"\bhire[sd]?\b",
    r"\bpromote[sd]?\b",
    r"\bpartnership\b",
    r"\bcollaboration\b",
    r"\bmerger\b",
    r"\bacquisition\b",
    r"\binvestment\b",
    r"\bdeal\b",
    r"\bagreement\b",
    r"\bcontract\b",
    r"\bquarterly\b",
    r"\bannual\b",
    r"\bupdate[sd]?\b",
    r"\breports?\b",
    r"\bstatement\b",
    r"\bresults\b",
];

/// Raw pattern tables, borrowed so tests can build small variants
#[derive(Debug, Clone, Copy)]
pub struct LexiconTables<'a> {
    pub generic_terms: &'a [&'a str],
    pub high_risk_words: &'a [&'a str],
    pub business_context: &'a [&'a str],
    pub non_business: &'a [&'a str],
    pub person_titles: &'a [&'a str],
    pub person_name_patterns: &'a [&'a str],
    pub tone_positive: &'a [&'a str],
    pub tone_negative: &'a [&'a str],
    pub tone_neutral: &'a [&'a str],
}

pub const STANDARD_TABLES: LexiconTables<'static> = LexiconTables {
    generic_terms: GENERIC_TERMS,
    high_risk_words: HIGH_RISK_WORDS,
    business_context: BUSINESS_CONTEXT_PATTERNS,
    non_business: NON_BUSINESS_PATTERNS,
    person_titles: PERSON_TITLES,
    person_name_patterns: PERSON_NAME_PATTERNS,
    tone_positive: POSITIVE_TONE_PATTERNS,
    tone_negative: NEGATIVE_TONE_PATTERNS,
    tone_neutral: NEUTRAL_TONE_PATTERNS,
};

/// Business-context evidence in a piece of text.
///
/// Counts are distinct patterns that matched, not total occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessContext {
    pub positive: usize,
    pub negative: usize,
}

impl BusinessContext {
    /// Context is present when positive evidence outweighs negative by at least two.
    pub fn is_present(&self) -> bool {
        self.positive as i64 - self.negative as i64 >= 2
    }
}

/// Tone pattern hits, counted as total occurrences across the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

/// Compiled lexicons
pub struct Lexicons {
    generic_terms: HashSet<String>,
    high_risk_words: HashSet<String>,
    business_context: Vec<Regex>,
    non_business: Vec<Regex>,
    person_titles: HashSet<String>,
    person_name_patterns: Vec<Regex>,
    tone_positive: Vec<Regex>,
    tone_negative: Vec<Regex>,
    tone_neutral: Vec<Regex>,
}

impl Lexicons {
    pub fn standard() -> Self {
        Self::compile(&STANDARD_TABLES).expect("standard lexicon patterns compile")
    }

    pub fn compile(tables: &LexiconTables<'_>) -> Result<Self, regex::Error> {
        Ok(Self {
            generic_terms: word_set(tables.generic_terms),
            high_risk_words: word_set(tables.high_risk_words),
            business_context: compile_all(tables.business_context)?,
            non_business: compile_all(tables.non_business)?,
            person_titles: word_set(tables.person_titles),
            person_name_patterns: compile_all(tables.person_name_patterns)?,
            tone_positive: compile_all(tables.tone_positive)?,
            tone_negative: compile_all(tables.tone_negative)?,
            tone_neutral: compile_all(tables.tone_neutral)?,
        })
    }

    pub fn is_generic(&self, word: &str) -> bool {
        self.generic_terms.contains(&word.to_lowercase())
    }

    pub fn is_high_risk(&self, word: &str) -> bool {
        self.high_risk_words.contains(&word.to_lowercase())
    }

    /// Count business and non-business evidence in the text
    pub fn business_context(&self, text: &str) -> BusinessContext {
        let text = text.to_lowercase();
        BusinessContext {
            positive: patterns_matched(&self.business_context, &text),
            negative: patterns_matched(&self.non_business, &text),
        }
    }

    /// Count tone pattern occurrences in the text
    pub fn tone_counts(&self, text: &str) -> ToneCounts {
        let text = text.to_lowercase();
        ToneCounts {
            positive: occurrences(&self.tone_positive, &text),
            negative: occurrences(&self.tone_negative, &text),
            neutral: occurrences(&self.tone_neutral, &text),
        }
    }

    /// Whether a company name reads like a personal name.
    ///
    /// Names of three characters or fewer, or without an internal space,
    /// are never flagged.
    pub fn is_likely_person_name(&self, name: &str) -> bool {
        let name = name.trim();
        if name.len() <= 3 || !name.contains(' ') {
            return false;
        }

        if let Some(first) = name.split_whitespace().next() {
            let first = first.trim_end_matches('.').to_lowercase();
            if self.person_titles.contains(&first) {
                return true;
            }
        }

        self.person_name_patterns.iter().any(|re| re.is_match(name))
    }
}

fn word_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}

fn patterns_matched(patterns: &[Regex], text: &str) -> usize {
    patterns.iter().filter(|re| re.is_match(text)).count()
}

fn occurrences(patterns: &[Regex], text: &str) -> usize {
    patterns.iter().map(|re| re.find_iter(text).count()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicons() -> Lexicons {
        Lexicons::standard()
    }

    #[test]
    fn test_generic_and_high_risk_lookups() {
        let lex = lexicons();
        assert!(lex.is_generic("The"));
        assert!(lex.is_generic("next"));
        assert!(!lex.is_generic("acme"));
        assert!(lex.is_high_risk("advance"));
        assert!(lex.is_high_risk("House"));
        assert!(!lex.is_high_risk("apple"));
    }

    #[test]
    fn test_business_context_requires_net_two() {
        let lex = lexicons();

        // Two positive hits, no negative
        let ctx = lex.business_context("The startup announces a new platform");
        assert!(ctx.positive >= 2);
        assert_eq!(ctx.negative, 0);
        assert!(ctx.is_present());

        // One positive hit is not enough
        let ctx = lex.business_context("Apple announces new iPhone");
        assert_eq!(ctx.positive, 1);
        assert!(!ctx.is_present());
    }

    #[test]
    fn test_sports_text_yields_negative_context() {
        let lex = lexicons();
        let ctx = lex.business_context("Team advances to the finals");
        assert_eq!(ctx.positive, 0);
        assert_eq!(ctx.negative, 2);
        assert!(!ctx.is_present());
    }

    #[test]
    fn test_negative_evidence_offsets_positive() {
        let lex = lexicons();
        let ctx = lex.business_context("The school hosts a startup funding game for every student");
        // startup + funding vs school + game + student
        assert_eq!(ctx.positive, 2);
        assert_eq!(ctx.negative, 3);
        assert!(!ctx.is_present());
    }

    #[test]
    fn test_patterns_counted_once_per_pattern() {
        let lex = lexicons();
        let ctx = lex.business_context("company company company");
        assert_eq!(ctx.positive, 1);
    }

    #[test]
    fn test_tone_counts_count_occurrences() {
        let lex = lexicons();
        let counts = lex.tone_counts("Profits surge as profits grow");
        assert_eq!(counts.positive, 4);
        assert_eq!(counts.negative, 0);
    }

    #[test]
    fn test_person_name_detection() {
        let lex = lexicons();
        assert!(lex.is_likely_person_name("John Smith"));
        assert!(lex.is_likely_person_name("Dr. Jane Doe"));
        assert!(lex.is_likely_person_name("Mary Jane Watson"));
        // Short or single-token names are never flagged
        assert!(!lex.is_likely_person_name("Bob"));
        assert!(!lex.is_likely_person_name("Stripe"));
        assert!(!lex.is_likely_person_name("IBM"));
        // All-caps words do not fit the capitalized-name shape
        assert!(!lex.is_likely_person_name("ACME CORP"));
    }

    #[test]
    fn test_compile_rejects_bad_pattern() {
        let tables = LexiconTables {
            business_context: &["["],
            ..STANDARD_TABLES
        };
        assert!(Lexicons::compile(&tables).is_err());
    }
}
