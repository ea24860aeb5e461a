//! Defense event domain types.
//!
//! A defense event occupies one room/time slot and carries an ordered list of
//! person assignments with role tags. Slots are `(room, date, start, end)`
//! with half-open `[start, end)` windows at minute resolution.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{CaseId, EventId, PeriodId, PersonId, RoomId};
use crate::models::time::ClockTime;

/// Role of a person within a single defense event.
///
/// Advisors carry a per-person capacity ceiling; examiners do not. A case has
/// up to two advisors and up to three tagged examiner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Advisor1,
    Advisor2,
    Examiner1,
    Examiner2,
    Examiner3,
}

impl Role {
    pub fn is_advisor(&self) -> bool {
        matches!(self, Role::Advisor1 | Role::Advisor2)
    }

    pub fn is_examiner(&self) -> bool {
        !self.is_advisor()
    }
}

/// One person assigned to an event under a role tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub person: PersonId,
    pub role: Role,
}

impl Assignment {
    pub fn new(person: PersonId, role: Role) -> Self {
        Self { person, role }
    }
}

/// The room/time tuple an event occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub room: RoomId,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeSlot {
    /// Slot length in minutes. Valid slots always have `start < end`.
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }
}

/// A committed or candidate defense event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseEvent {
    /// Assigned on commit; `None` while the event is only a proposal.
    pub id: Option<EventId>,
    pub period_id: PeriodId,
    pub case_id: CaseId,
    pub slot: TimeSlot,
    pub assignments: Vec<Assignment>,
}

impl DefenseEvent {
    /// People assigned under advisor roles.
    pub fn advisors(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.assignments
            .iter()
            .filter(|a| a.role.is_advisor())
            .map(|a| a.person)
    }

    /// People assigned under examiner roles.
    pub fn examiners(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.assignments
            .iter()
            .filter(|a| a.role.is_examiner())
            .map(|a| a.person)
    }

    /// All assigned people, in assignment order.
    pub fn people(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.assignments.iter().map(|a| a.person)
    }

    /// Whether the given person appears in any role.
    pub fn involves(&self, person: PersonId) -> bool {
        self.assignments.iter().any(|a| a.person == person)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> TimeSlot {
        TimeSlot {
            room: RoomId::new(1),
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            start: ClockTime::from_hm(9, 30).unwrap(),
            end: ClockTime::from_hm(11, 30).unwrap(),
        }
    }

    #[test]
    fn test_role_partition() {
        assert!(Role::Advisor1.is_advisor());
        assert!(Role::Advisor2.is_advisor());
        assert!(Role::Examiner1.is_examiner());
        assert!(!Role::Examiner3.is_advisor());
    }

    #[test]
    fn test_event_role_iterators() {
        let event = DefenseEvent {
            id: None,
            period_id: PeriodId::new(1),
            case_id: CaseId::new(10),
            slot: slot(),
            assignments: vec![
                Assignment::new(PersonId::new(1), Role::Advisor1),
                Assignment::new(PersonId::new(2), Role::Examiner1),
                Assignment::new(PersonId::new(3), Role::Examiner2),
            ],
        };

        assert_eq!(event.advisors().collect::<Vec<_>>(), vec![PersonId::new(1)]);
        assert_eq!(
            event.examiners().collect::<Vec<_>>(),
            vec![PersonId::new(2), PersonId::new(3)]
        );
        assert!(event.involves(PersonId::new(3)));
        assert!(!event.involves(PersonId::new(9)));
    }

    #[test]
    fn test_slot_duration() {
        assert_eq!(slot().duration_minutes(), 120);
    }
}
