//! Slot conflict detection.
//!
//! A pure predicate over the committed-event corpus plus one candidate. The
//! detector never mutates anything; the service layer decides what to do with
//! the findings. Every conflict is collected and reported, not just the
//! first, so a caller can show a complete explanation.

use serde::{Deserialize, Serialize};

use crate::api::{CaseId, EventId, PersonId};
use crate::engine::interval::overlaps;
use crate::models::event::DefenseEvent;

/// Why a candidate clashes with a committed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictReason {
    /// Same room, same date, overlapping window.
    RoomConflict,
    /// The named person is already booked in an overlapping window on the
    /// same date, in any room and any role.
    PersonConflict { person: PersonId },
}

/// One detected clash, naming the committed event it clashes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictFinding {
    #[serde(flatten)]
    pub reason: ConflictReason,
    pub conflicting_event: EventId,
    pub conflicting_case: CaseId,
}

/// Check a candidate event against the committed corpus.
///
/// Committed events sharing the candidate's id are skipped, so the same
/// function re-validates an already committed event against the rest of the
/// corpus during batch generation.
///
/// Returns every room and person clash found; an empty vector means the
/// candidate is acceptable.
pub fn find_conflicts(candidate: &DefenseEvent, committed: &[DefenseEvent]) -> Vec<ConflictFinding> {
    let mut findings = Vec::new();

    for existing in committed {
        if existing.id.is_some() && existing.id == candidate.id {
            continue;
        }
        if existing.slot.date != candidate.slot.date {
            continue;
        }

        let window_overlaps = overlaps(
            candidate.slot.start,
            candidate.slot.end,
            existing.slot.start,
            existing.slot.end,
        );
        if !window_overlaps {
            continue;
        }

        let conflicting_event = match existing.id {
            Some(id) => id,
            // Uncommitted events have no id to report against; the corpus
            // passed in is expected to be committed rows.
            None => continue,
        };

        if existing.slot.room == candidate.slot.room {
            findings.push(ConflictFinding {
                reason: ConflictReason::RoomConflict,
                conflicting_event,
                conflicting_case: existing.case_id,
            });
        }

        for person in candidate.people() {
            if existing.involves(person) {
                findings.push(ConflictFinding {
                    reason: ConflictReason::PersonConflict { person },
                    conflicting_event,
                    conflicting_case: existing.case_id,
                });
            }
        }
    }

    findings
}

/// Whether a slot is free of room clashes, ignoring people.
///
/// Used by the automatic generator to skip occupied slots cheaply before
/// trying examiner combinations.
pub fn slot_is_free(candidate: &DefenseEvent, committed: &[DefenseEvent]) -> bool {
    !committed.iter().any(|existing| {
        existing.id != candidate.id
            && existing.slot.date == candidate.slot.date
            && existing.slot.room == candidate.slot.room
            && overlaps(
                candidate.slot.start,
                candidate.slot.end,
                existing.slot.start,
                existing.slot.end,
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PeriodId, RoomId};
    use crate::models::event::{Assignment, Role, TimeSlot};
    use crate::models::time::ClockTime;
    use chrono::NaiveDate;

    fn event(
        id: Option<i64>,
        case: i64,
        room: i64,
        start: (u16, u16),
        end: (u16, u16),
        people: &[(i64, Role)],
    ) -> DefenseEvent {
        DefenseEvent {
            id: id.map(EventId::new),
            period_id: PeriodId::new(1),
            case_id: CaseId::new(case),
            slot: TimeSlot {
                room: RoomId::new(room),
                date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                start: ClockTime::from_hm(start.0, start.1).unwrap(),
                end: ClockTime::from_hm(end.0, end.1).unwrap(),
            },
            assignments: people
                .iter()
                .map(|(p, r)| Assignment::new(PersonId::new(*p), *r))
                .collect(),
        }
    }

    #[test]
    fn test_room_conflict_names_the_committed_event() {
        let committed = vec![event(
            Some(1),
            100,
            1,
            (9, 30),
            (11, 30),
            &[(7, Role::Examiner1)],
        )];
        let candidate = event(None, 101, 1, (11, 0), (12, 0), &[(8, Role::Examiner1)]);

        let findings = find_conflicts(&candidate, &committed);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].reason, ConflictReason::RoomConflict);
        assert_eq!(findings[0].conflicting_event, EventId::new(1));
        assert_eq!(findings[0].conflicting_case, CaseId::new(100));
    }

    #[test]
    fn test_person_conflict_across_rooms() {
        let committed = vec![event(
            Some(1),
            100,
            1,
            (9, 30),
            (11, 30),
            &[(7, Role::Examiner1)],
        )];
        // Different room, same examiner, overlapping window.
        let candidate = event(None, 101, 2, (10, 0), (10, 30), &[(7, Role::Examiner1)]);

        let findings = find_conflicts(&candidate, &committed);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].reason,
            ConflictReason::PersonConflict {
                person: PersonId::new(7)
            }
        );
        assert_eq!(findings[0].conflicting_event, EventId::new(1));
    }

    #[test]
    fn test_touching_windows_are_clean() {
        let committed = vec![event(
            Some(1),
            100,
            1,
            (9, 30),
            (11, 30),
            &[(7, Role::Examiner1)],
        )];
        let candidate = event(None, 101, 1, (11, 30), (13, 0), &[(7, Role::Examiner1)]);

        assert!(find_conflicts(&candidate, &committed).is_empty());
    }

    #[test]
    fn test_multiple_findings_are_all_collected() {
        let committed = vec![
            event(Some(1), 100, 1, (9, 0), (11, 0), &[(7, Role::Examiner1)]),
            event(Some(2), 101, 2, (10, 0), (12, 0), &[(8, Role::Advisor1)]),
        ];
        // Clashes with event 1 on room AND person 7, and with event 2 on
        // person 8.
        let candidate = event(
            None,
            102,
            1,
            (10, 0),
            (11, 0),
            &[(7, Role::Advisor1), (8, Role::Examiner1)],
        );

        let findings = find_conflicts(&candidate, &committed);
        assert_eq!(findings.len(), 3);
        assert!(findings
            .iter()
            .any(|f| f.reason == ConflictReason::RoomConflict));
        assert!(findings.iter().any(|f| f.reason
            == ConflictReason::PersonConflict {
                person: PersonId::new(7)
            }));
        assert!(findings.iter().any(|f| f.reason
            == ConflictReason::PersonConflict {
                person: PersonId::new(8)
            }));
    }

    #[test]
    fn test_revalidation_skips_self() {
        let committed = vec![
            event(Some(1), 100, 1, (9, 0), (11, 0), &[(7, Role::Examiner1)]),
            event(Some(2), 101, 2, (13, 0), (14, 0), &[(8, Role::Examiner1)]),
        ];
        // Event 1 re-checked against the corpus it is part of.
        assert!(find_conflicts(&committed[0], &committed).is_empty());
    }

    #[test]
    fn test_different_dates_never_conflict() {
        let committed = vec![event(
            Some(1),
            100,
            1,
            (9, 30),
            (11, 30),
            &[(7, Role::Examiner1)],
        )];
        let mut candidate = event(None, 101, 1, (9, 30), (11, 30), &[(7, Role::Examiner1)]);
        candidate.slot.date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();

        assert!(find_conflicts(&candidate, &committed).is_empty());
    }

    #[test]
    fn test_slot_is_free() {
        let committed = vec![event(
            Some(1),
            100,
            1,
            (9, 30),
            (11, 30),
            &[(7, Role::Examiner1)],
        )];
        let busy = event(None, 101, 1, (10, 0), (11, 0), &[]);
        let free = event(None, 101, 1, (11, 30), (12, 30), &[]);
        assert!(!slot_is_free(&busy, &committed));
        assert!(slot_is_free(&free, &committed));
    }
}
