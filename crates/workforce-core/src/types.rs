//! # HR Master-Data Types
//!
//! Records behind the dashboard's CRUD modules. The list machinery only sees
//! them through [`Entity`]; their fields matter to the column catalogs and to
//! the backend.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         HR Master Data                                  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Organization   │   │     Region      │   │     Grade       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  code           │   │  code           │   │  code           │       │
//! │  │  name_en/_ar    │   │  name_en/_ar    │   │  name_en/_ar    │       │
//! │  │  parent_id      │   └─────────────────┘   │  overtime flag  │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Holiday      │   │ BiometricTerm.  │   │  WeeklyRoster   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  from/to dates  │   │  device_number  │   │  from/to dates  │       │
//! │  │  recurring      │   │  (string id)    │   │  organization   │       │
//! │  └─────────────────┘   │  ip:port status │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │  + Designation, Nationality, EmployeeType, LeaveType, PermissionType   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Bilingual Names
//! Every record carries an English and an Arabic name. The display name
//! follows the text direction of the [`RenderContext`] and falls back to the
//! other language when the preferred one is blank.
//!
//! Identifiers are optional on the wire: a record the backend sent without an
//! id deserializes fine and is skipped by the table renderer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::entity::{Entity, EntityId};
use crate::render::RenderContext;

/// Picks the name for the context's direction, falling back to the other.
pub fn localized_name(ctx: &RenderContext, name_en: &str, name_ar: &str) -> String {
    let (preferred, fallback) = if ctx.is_rtl() {
        (name_ar, name_en)
    } else {
        (name_en, name_ar)
    };

    if preferred.trim().is_empty() {
        fallback.to_string()
    } else {
        preferred.to_string()
    }
}

/// Implements `Entity` for a record with `id: Option<i64>` and bilingual names.
macro_rules! bilingual_entity {
    ($ty:ty, $kind:literal) => {
        impl Entity for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> Option<EntityId> {
                self.id.map(EntityId::Num)
            }

            fn display_name(&self, ctx: &RenderContext) -> String {
                localized_name(ctx, &self.name_en, &self.name_ar)
            }
        }
    };
}

// =============================================================================
// Region
// =============================================================================

/// A geographic region employees and organizations are grouped under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[serde(default)]
    pub id: Option<i64>,
    pub code: String,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Region {
    pub fn new(
        id: i64,
        code: impl Into<String>,
        name_en: impl Into<String>,
        name_ar: impl Into<String>,
    ) -> Self {
        Region {
            id: Some(id),
            code: code.into(),
            name_en: name_en.into(),
            name_ar: name_ar.into(),
            description: None,
        }
    }
}

bilingual_entity!(Region, "Region");

// =============================================================================
// Grade
// =============================================================================

/// A pay grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    #[serde(default)]
    pub id: Option<i64>,
    pub code: String,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
    /// Whether employees on this grade accrue overtime.
    #[serde(default)]
    pub overtime_eligible: bool,
    /// Senior grades bypass the first approval step of leave workflows.
    #[serde(default)]
    pub senior: bool,
}

bilingual_entity!(Grade, "Grade");

// =============================================================================
// Organization
// =============================================================================

/// A node of the organization tree (company, division, department, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(default)]
    pub id: Option<i64>,
    pub code: String,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Level label ("Division", "Department", ...).
    #[serde(default)]
    pub organization_type: Option<String>,
    #[serde(default)]
    pub manager_id: Option<i64>,
}

bilingual_entity!(Organization, "Organization");

// =============================================================================
// Designation
// =============================================================================

/// A job title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Designation {
    #[serde(default)]
    pub id: Option<i64>,
    pub code: String,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub remarks: Option<String>,
}

bilingual_entity!(Designation, "Designation");

// =============================================================================
// Nationality
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Nationality {
    #[serde(default)]
    pub id: Option<i64>,
    /// ISO 3166-1 alpha-3 country code.
    pub code: String,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
}

bilingual_entity!(Nationality, "Nationality");

// =============================================================================
// Employee Type
// =============================================================================

/// Employment category (permanent, contract, intern, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeType {
    #[serde(default)]
    pub id: Option<i64>,
    pub code: String,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

bilingual_entity!(EmployeeType, "Employee type");

// =============================================================================
// Holiday
// =============================================================================

/// A public or company holiday spanning one or more days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    #[serde(default)]
    pub id: Option<i64>,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
    #[ts(as = "String")]
    pub from_date: NaiveDate,
    #[ts(as = "String")]
    pub to_date: NaiveDate,
    /// Repeats every year on the same dates.
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub public_holiday: bool,
}

impl Holiday {
    /// Number of calendar days covered, inclusive. Zero if the range is inverted.
    pub fn days(&self) -> i64 {
        let span = (self.to_date - self.from_date).num_days();
        if span < 0 {
            0
        } else {
            span + 1
        }
    }
}

bilingual_entity!(Holiday, "Holiday");

// =============================================================================
// Biometric Terminal
// =============================================================================

/// Reachability of a biometric terminal as last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TerminalStatus {
    Online,
    #[default]
    Offline,
    Disabled,
}

impl std::fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalStatus::Online => write!(f, "online"),
            TerminalStatus::Offline => write!(f, "offline"),
            TerminalStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// A fingerprint / face attendance device.
///
/// Terminals are keyed by their device number, a string, not a numeric id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BiometricTerminal {
    #[serde(default)]
    pub device_number: Option<String>,
    pub device_name: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    pub ip_address: String,
    pub port: u16,
    #[serde(default)]
    pub status: TerminalStatus,
}

impl BiometricTerminal {
    /// `ip:port` as shown in the terminals table.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.ip_address, self.port)
    }
}

impl Entity for BiometricTerminal {
    const KIND: &'static str = "Biometric terminal";

    fn id(&self) -> Option<EntityId> {
        self.device_number
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .map(EntityId::from)
    }

    fn display_name(&self, _ctx: &RenderContext) -> String {
        self.device_name.clone()
    }

    fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.device_name.to_lowercase().contains(&needle)
            || self.ip_address.contains(&needle)
            || self
                .serial_number
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
    }
}

// =============================================================================
// Leave Type
// =============================================================================

/// A kind of leave employees can request (annual, sick, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LeaveType {
    #[serde(default)]
    pub id: Option<i64>,
    pub code: String,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
    /// Days granted per year.
    #[serde(default)]
    pub entitled_days: i64,
    #[serde(default = "default_true")]
    pub is_paid: bool,
}

bilingual_entity!(LeaveType, "Leave type");

// =============================================================================
// Permission Type
// =============================================================================

/// A kind of short absence (late arrival, early leave, personal errand).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PermissionType {
    #[serde(default)]
    pub id: Option<i64>,
    pub code: String,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub max_minutes_per_day: i64,
    #[serde(default)]
    pub max_per_month: i64,
}

bilingual_entity!(PermissionType, "Permission type");

// =============================================================================
// Weekly Roster
// =============================================================================

/// A weekly shift schedule applied to an organization for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRoster {
    #[serde(default)]
    pub id: Option<i64>,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
    #[ts(as = "String")]
    pub from_date: NaiveDate,
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub organization_id: Option<i64>,
}

bilingual_entity!(WeeklyRoster, "Weekly roster");

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_name_follows_direction() {
        let region = Region::new(1, "N", "Northern", "الشمالية");
        assert_eq!(region.display_name(&RenderContext::ltr("en")), "Northern");
        assert_eq!(region.display_name(&RenderContext::rtl("ar")), "الشمالية");
    }

    #[test]
    fn test_localized_name_falls_back() {
        let region = Region::new(1, "N", "Northern", "  ");
        assert_eq!(region.display_name(&RenderContext::rtl("ar")), "Northern");
    }

    #[test]
    fn test_missing_id_deserializes() {
        let region: Region =
            serde_json::from_str(r#"{"code":"E","nameEn":"Eastern"}"#).unwrap();
        assert!(region.id().is_none());
        assert_eq!(region.name_ar, "");
    }

    #[test]
    fn test_holiday_days() {
        let holiday = Holiday {
            id: Some(1),
            name_en: "Eid".to_string(),
            name_ar: "عيد".to_string(),
            from_date: NaiveDate::from_ymd_opt(2025, 3, 30).unwrap(),
            to_date: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
            recurring: false,
            public_holiday: true,
        };
        assert_eq!(holiday.days(), 4);
    }

    #[test]
    fn test_terminal_uses_device_number() {
        let json = r#"{"deviceNumber":"T-07","deviceName":"Gate A","ipAddress":"10.0.0.7","port":4370,"status":"online"}"#;
        let terminal: BiometricTerminal = serde_json::from_str(json).unwrap();
        assert_eq!(terminal.id(), Some(EntityId::from("T-07")));
        assert_eq!(terminal.endpoint(), "10.0.0.7:4370");
        assert_eq!(terminal.status, TerminalStatus::Online);
        assert!(terminal.matches_search("10.0.0"));

        let blank = BiometricTerminal {
            device_number: Some(" ".to_string()),
            ..terminal
        };
        assert!(blank.id().is_none());
    }
}
