//! Topic grammar for upstream change events.
//!
//! Every mirrored entity publishes on `event.<EntityName>.<verb>` where the
//! verb is one of `created`, `modified` or `deleted`. Some entities are never
//! deleted upstream and therefore have no `deleted` topic.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Prefix shared by every upstream change topic.
pub const TOPIC_PREFIX: &str = "event";

// ---------------------------------------------------------------------------
// Verb
// ---------------------------------------------------------------------------

/// The kind of change an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Created,
    Modified,
    Deleted,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Created => "created",
            Verb::Modified => "modified",
            Verb::Deleted => "deleted",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(Verb::Created),
            "modified" => Some(Verb::Modified),
            "deleted" => Some(Verb::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verbs for entities the upstream system both changes and removes.
const ALL_VERBS: &[Verb] = &[Verb::Created, Verb::Modified, Verb::Deleted];

/// Verbs for entities the upstream system never deletes.
const UPSERT_VERBS: &[Verb] = &[Verb::Created, Verb::Modified];

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Every upstream-owned entity mirrored into the local database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EntityKind {
    PayrollCompany,
    Employee,
    CompanyLevel,
    GradeLevel,
    Holiday,
    JobTitle,
    CompanyCurrencyConfig,
    Currency,
    PayPeriod,
    Overtime,
    OvertimePaymentTier,
    Department,
    DepartmentLeadership,
}

impl EntityKind {
    /// All mirrored entity kinds.
    pub const ALL: [EntityKind; 13] = [
        EntityKind::PayrollCompany,
        EntityKind::Employee,
        EntityKind::CompanyLevel,
        EntityKind::GradeLevel,
        EntityKind::Holiday,
        EntityKind::JobTitle,
        EntityKind::CompanyCurrencyConfig,
        EntityKind::Currency,
        EntityKind::PayPeriod,
        EntityKind::Overtime,
        EntityKind::OvertimePaymentTier,
        EntityKind::Department,
        EntityKind::DepartmentLeadership,
    ];

    /// Name as it appears in topics, e.g. `"DepartmentLeadership"`.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::PayrollCompany => "PayrollCompany",
            EntityKind::Employee => "Employee",
            EntityKind::CompanyLevel => "CompanyLevel",
            EntityKind::GradeLevel => "GradeLevel",
            EntityKind::Holiday => "Holiday",
            EntityKind::JobTitle => "JobTitle",
            EntityKind::CompanyCurrencyConfig => "CompanyCurrencyConfig",
            EntityKind::Currency => "Currency",
            EntityKind::PayPeriod => "PayPeriod",
            EntityKind::Overtime => "Overtime",
            EntityKind::OvertimePaymentTier => "OvertimePaymentTier",
            EntityKind::Department => "Department",
            EntityKind::DepartmentLeadership => "DepartmentLeadership",
        }
    }

    /// Kebab-case name used in URLs, e.g. `"department-leadership"`.
    pub fn slug(self) -> &'static str {
        match self {
            EntityKind::PayrollCompany => "payroll-company",
            EntityKind::Employee => "employee",
            EntityKind::CompanyLevel => "company-level",
            EntityKind::GradeLevel => "grade-level",
            EntityKind::Holiday => "holiday",
            EntityKind::JobTitle => "job-title",
            EntityKind::CompanyCurrencyConfig => "company-currency-config",
            EntityKind::Currency => "currency",
            EntityKind::PayPeriod => "pay-period",
            EntityKind::Overtime => "overtime",
            EntityKind::OvertimePaymentTier => "overtime-payment-tier",
            EntityKind::Department => "department",
            EntityKind::DepartmentLeadership => "department-leadership",
        }
    }

    /// Verbs the upstream system publishes for this entity.
    ///
    /// Company levels, currencies and pay periods are never deleted upstream.
    pub fn verbs(self) -> &'static [Verb] {
        match self {
            EntityKind::CompanyLevel | EntityKind::Currency | EntityKind::PayPeriod => {
                UPSERT_VERBS
            }
            _ => ALL_VERBS,
        }
    }

    /// Whether the upstream system publishes `verb` events for this entity.
    pub fn supports(self, verb: Verb) -> bool {
        self.verbs().contains(&verb)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no known entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity: {0}")]
pub struct UnknownEntity(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntity;

    /// Accepts the topic name (`DepartmentLeadership`) or the URL slug
    /// (`department-leadership`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s || kind.slug() == s)
            .ok_or_else(|| UnknownEntity(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// A parsed `event.<Entity>.<verb>` topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Topic {
    pub entity: EntityKind,
    pub verb: Verb,
}

impl Topic {
    pub fn new(entity: EntityKind, verb: Verb) -> Self {
        Self { entity, verb }
    }

    /// Parse a topic string. Returns `None` for anything outside the grammar,
    /// including verbs the entity never publishes.
    pub fn parse(topic: &str) -> Option<Self> {
        let mut parts = topic.split('.');
        let (prefix, name, verb) = (parts.next()?, parts.next()?, parts.next()?);
        if prefix != TOPIC_PREFIX || parts.next().is_some() {
            return None;
        }
        let entity = EntityKind::ALL.into_iter().find(|kind| kind.name() == name)?;
        let verb = Verb::parse(verb)?;
        entity.supports(verb).then_some(Self { entity, verb })
    }

    /// Every topic published for `entity`.
    pub fn all_for(entity: EntityKind) -> impl Iterator<Item = Topic> {
        entity.verbs().iter().map(move |&verb| Topic::new(entity, verb))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TOPIC_PREFIX}.{}.{}", self.entity.name(), self.verb)
    }
}
