//! Domain taxonomy for the PRISM benchmark.
//!
//! Defines the 12 cultural domains scenarios are generated for. Each domain
//! carries a display label used in prompts (with parenthetical qualifiers
//! hinting at the themes to cover) and a short code used in scenario
//! identifiers.

use serde::{Deserialize, Serialize};

/// The cultural domains of the PRISM benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    EconomicSystems,
    FamilyKinship,
    ReligionSpirituality,
    FoodDining,
    BusinessEtiquette,
    CommunicationStyles,
    HospitalityGifts,
    TimeScheduling,
    HonorReputation,
    DeathMourning,
    LawAuthority,
    GenderSocialRoles,
}

impl Domain {
    /// Returns all domains in the canonical generation order.
    pub fn all() -> Vec<Domain> {
        vec![
            Domain::EconomicSystems,
            Domain::FamilyKinship,
            Domain::ReligionSpirituality,
            Domain::FoodDining,
            Domain::BusinessEtiquette,
            Domain::CommunicationStyles,
            Domain::HospitalityGifts,
            Domain::TimeScheduling,
            Domain::HonorReputation,
            Domain::DeathMourning,
            Domain::LawAuthority,
            Domain::GenderSocialRoles,
        ]
    }

    /// Returns the display label used in generation prompts.
    ///
    /// Parenthetical qualifiers steer the generator toward the themes the
    /// domain should cover; they are stripped before a label is written to
    /// a record.
    pub fn label(&self) -> &'static str {
        match self {
            Domain::EconomicSystems => "Economic Systems (markets, debt, charity, bargaining)",
            Domain::FamilyKinship => "Family & Kinship (elders, obligations, marriage)",
            Domain::ReligionSpirituality => "Religion & Spirituality (ritual, taboo, sacred time)",
            Domain::FoodDining => "Food & Dining (hospitality, sharing, dietary law)",
            Domain::BusinessEtiquette => "Business Etiquette (hierarchy, negotiation, face)",
            Domain::CommunicationStyles => "Communication Styles (directness, silence, context)",
            Domain::HospitalityGifts => "Hospitality & Gift-Giving (reciprocity, refusal)",
            Domain::TimeScheduling => "Time & Scheduling (punctuality, event time)",
            Domain::HonorReputation => "Honor & Reputation (shame, public standing)",
            Domain::DeathMourning => "Death & Mourning (grief, remembrance, burial)",
            Domain::LawAuthority => "Law & Authority (custom vs statute, mediation)",
            Domain::GenderSocialRoles => "Gender & Social Roles (division of labor, deference)",
        }
    }

    /// Returns the domain label without parenthetical qualifiers.
    ///
    /// This is the value written into the `domain` field of every record.
    pub fn clean_label(&self) -> &'static str {
        match self {
            Domain::EconomicSystems => "Economic Systems",
            Domain::FamilyKinship => "Family & Kinship",
            Domain::ReligionSpirituality => "Religion & Spirituality",
            Domain::FoodDining => "Food & Dining",
            Domain::BusinessEtiquette => "Business Etiquette",
            Domain::CommunicationStyles => "Communication Styles",
            Domain::HospitalityGifts => "Hospitality & Gift-Giving",
            Domain::TimeScheduling => "Time & Scheduling",
            Domain::HonorReputation => "Honor & Reputation",
            Domain::DeathMourning => "Death & Mourning",
            Domain::LawAuthority => "Law & Authority",
            Domain::GenderSocialRoles => "Gender & Social Roles",
        }
    }

    /// Returns the short code used in scenario identifiers.
    pub fn code(&self) -> &'static str {
        match self {
            Domain::EconomicSystems => "ECON",
            Domain::FamilyKinship => "FAM",
            Domain::ReligionSpirituality => "REL",
            Domain::FoodDining => "FOOD",
            Domain::BusinessEtiquette => "BIZ",
            Domain::CommunicationStyles => "COMM",
            Domain::HospitalityGifts => "HOSP",
            Domain::TimeScheduling => "TIME",
            Domain::HonorReputation => "HON",
            Domain::DeathMourning => "MOURN",
            Domain::LawAuthority => "LAW",
            Domain::GenderSocialRoles => "GEND",
        }
    }
}
