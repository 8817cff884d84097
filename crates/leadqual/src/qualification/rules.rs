//! Deterministic rule scorer: pure functions over a prospect and the offer
//! context, bounded to 0-50 with an itemized breakdown. No I/O.

use super::domain::{OfferContext, ProspectRecord, RuleBreakdown};

/// Titles that indicate buying authority. Checked before the influencer
/// list; substring containment, first hit wins.
const DECISION_MAKER_TITLES: &[&str] = &[
    "ceo",
    "cto",
    "cfo",
    "coo",
    "cmo",
    "cro",
    "cio",
    "chief",
    "vice president",
    "vp",
    "director",
    "head of",
    "founder",
    "co-founder",
    "owner",
    "president",
    "partner",
];

const INFLUENCER_TITLES: &[&str] = &[
    "senior",
    "lead",
    "manager",
    "principal",
    "staff",
    "consultant",
];

/// Coarse industry categories with keyword synonyms. A string is assumed to
/// belong to at most one category; lookup returns the first match in table
/// order.
const INDUSTRY_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "technology",
        &[
            "tech",
            "software",
            "saas",
            "cloud",
            "internet",
            "computer",
            "digital",
            "information technology",
            "artificial intelligence",
            "telecom",
        ],
    ),
    (
        "business services",
        &[
            "consulting",
            "professional services",
            "staffing",
            "recruiting",
            "outsourcing",
            "business services",
            "marketing",
            "advertising",
            "agency",
        ],
    ),
    (
        "financial",
        &[
            "financ",
            "bank",
            "insurance",
            "investment",
            "capital",
            "accounting",
            "lending",
        ],
    ),
    (
        "healthcare",
        &[
            "health",
            "medical",
            "pharma",
            "biotech",
            "hospital",
            "clinic",
            "wellness",
        ],
    ),
    (
        "ecommerce",
        &[
            "ecommerce",
            "e-commerce",
            "retail",
            "marketplace",
            "commerce",
            "consumer goods",
        ],
    ),
    (
        "manufacturing",
        &[
            "manufactur",
            "industrial",
            "automotive",
            "construction",
            "logistics",
            "supply chain",
            "machinery",
        ],
    ),
    (
        "media",
        &[
            "media",
            "entertainment",
            "publishing",
            "gaming",
            "streaming",
            "news",
        ],
    ),
    (
        "education",
        &[
            "education",
            "learning",
            "training",
            "university",
            "school",
            "academic",
        ],
    ),
];

/// 20 for decision makers, 10 for influencers, 0 otherwise.
pub fn role_score(role: &str) -> u8 {
    if has_decision_maker_title(role) {
        20
    } else if contains_any(&role.trim().to_lowercase(), INFLUENCER_TITLES) {
        10
    } else {
        0
    }
}

pub fn has_decision_maker_title(role: &str) -> bool {
    contains_any(&role.trim().to_lowercase(), DECISION_MAKER_TITLES)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    !haystack.is_empty() && needles.iter().any(|needle| haystack.contains(needle))
}

/// 20 for a direct substring match between the industry and any ideal use
/// case, 10 when both map to the same coarse category, 0 otherwise.
pub fn industry_score(industry: &str, ideal_use_cases: &[String]) -> u8 {
    if industry_direct_match(industry, ideal_use_cases) {
        return 20;
    }

    let industry = industry.trim().to_lowercase();
    let Some(category) = category_for(&industry) else {
        return 0;
    };

    let adjacent = ideal_use_cases
        .iter()
        .filter_map(|use_case| category_for(&use_case.trim().to_lowercase()))
        .any(|use_case_category| use_case_category == category);

    if adjacent {
        10
    } else {
        0
    }
}

pub fn industry_direct_match(industry: &str, ideal_use_cases: &[String]) -> bool {
    let industry = industry.trim().to_lowercase();
    if industry.is_empty() {
        return false;
    }

    ideal_use_cases.iter().any(|use_case| {
        let use_case = use_case.trim().to_lowercase();
        !use_case.is_empty() && (use_case.contains(&industry) || industry.contains(&use_case))
    })
}

fn category_for(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return None;
    }
    INDUSTRY_CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| value.contains(keyword)))
        .map(|(category, _)| *category)
}

/// 10 only when every profile field survives trimming; a single blank field
/// zeroes the component.
pub fn completeness_score(prospect: &ProspectRecord) -> u8 {
    let complete = [
        prospect.name.as_str(),
        prospect.role.as_str(),
        prospect.company.as_str(),
        prospect.industry.as_str(),
        prospect.location.as_str(),
        prospect.professional_summary.as_str(),
    ]
    .iter()
    .all(|field| !field.trim().is_empty());

    if complete {
        10
    } else {
        0
    }
}

/// Total rule score with its breakdown. Total over any input: blank or
/// malformed fields contribute zero components rather than failing.
pub fn rule_breakdown(prospect: &ProspectRecord, offer: &OfferContext) -> RuleBreakdown {
    let role_score = role_score(&prospect.role);
    let industry_score = industry_score(&prospect.industry, &offer.ideal_use_cases);
    let completeness_score = completeness_score(prospect);

    RuleBreakdown {
        role_score,
        industry_score,
        completeness_score,
        total: role_score + industry_score + completeness_score,
    }
}

/// Human-readable names for the rule factors that fired, used as the prefix
/// of a scored lead's combined reasoning.
pub fn rule_factors(breakdown: &RuleBreakdown) -> Vec<&'static str> {
    let mut factors = Vec::new();
    match breakdown.role_score {
        20 => factors.push("decision maker role"),
        10 => factors.push("influencer role"),
        _ => {}
    }
    match breakdown.industry_score {
        20 => factors.push("excellent industry fit"),
        10 => factors.push("good industry fit"),
        _ => {}
    }
    if breakdown.completeness_score == 10 {
        factors.push("complete profile data");
    }
    factors
}
