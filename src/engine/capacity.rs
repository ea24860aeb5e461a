//! Capacity allocation rules.
//!
//! Validates the person side of a candidate event: role exclusivity, examiner
//! count bounds, and advisor load ceilings. Advisor loads are always derived
//! from the committed-event corpus, never stored as an independent counter,
//! so they cannot drift.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::api::PersonId;
use crate::config::SchedulingSettings;
use crate::models::event::DefenseEvent;

/// A capacity rule violation. Rules are checked in declaration order and the
/// first violation wins, so error reports stay deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityViolation {
    #[error("person {person} appears more than once in the event")]
    DuplicatePerson { person: PersonId },

    #[error("person {person} holds both an advisor and an examiner role for the case")]
    RoleOverlap { person: PersonId },

    #[error("event has {count} examiner(s); expected between 1 and {max}")]
    ExaminerCountOutOfRange { count: usize, max: usize },

    #[error("advisor {person} already carries {load} committed case(s) of a ceiling of {ceiling}")]
    CapacityExceeded {
        person: PersonId,
        load: u32,
        ceiling: u32,
    },
}

impl CapacityViolation {
    /// Stable machine-readable code for API payloads.
    pub fn code(&self) -> &'static str {
        match self {
            CapacityViolation::DuplicatePerson { .. } => "DUPLICATE_PERSON",
            CapacityViolation::RoleOverlap { .. } => "ROLE_OVERLAP",
            CapacityViolation::ExaminerCountOutOfRange { .. } => "EXAMINER_COUNT_OUT_OF_RANGE",
            CapacityViolation::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
        }
    }
}

/// Per-advisor committed-case counts, derived from the event corpus.
#[derive(Debug, Clone, Default)]
pub struct AdvisorLoads {
    counts: HashMap<PersonId, u32>,
}

impl AdvisorLoads {
    /// Recompute loads from committed events. Each event counts once per
    /// advisor-role assignment it carries.
    pub fn from_events(events: &[DefenseEvent]) -> Self {
        Self::from_events_excluding(events, None)
    }

    /// Same as [`from_events`](Self::from_events), but ignoring the event
    /// with the given id. Used when re-validating a committed event against
    /// the rest of the corpus.
    pub fn from_events_excluding(
        events: &[DefenseEvent],
        exclude: Option<crate::api::EventId>,
    ) -> Self {
        let mut counts = HashMap::new();
        for event in events {
            if exclude.is_some() && event.id == exclude {
                continue;
            }
            for advisor in event.advisors() {
                *counts.entry(advisor).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    /// Current committed-case count for a person.
    pub fn load(&self, person: PersonId) -> u32 {
        self.counts.get(&person).copied().unwrap_or(0)
    }
}

/// Validate a candidate event's assignments against the capacity rules.
///
/// Rule order: duplicate person, advisor/examiner role overlap, examiner
/// count, advisor ceiling. Examiner roles carry no load ceiling.
pub fn check_capacity(
    candidate: &DefenseEvent,
    loads: &AdvisorLoads,
    settings: &SchedulingSettings,
) -> Result<(), CapacityViolation> {
    // Rule 1a: the same person must not fill two roles of the same family.
    let mut seen_advisors = HashSet::new();
    let mut seen_examiners = HashSet::new();
    for assignment in &candidate.assignments {
        let seen = if assignment.role.is_advisor() {
            &mut seen_advisors
        } else {
            &mut seen_examiners
        };
        if !seen.insert(assignment.person) {
            return Err(CapacityViolation::DuplicatePerson {
                person: assignment.person,
            });
        }
    }

    // Rule 1b: advisor and examiner roles for the same case must not share a
    // person.
    if let Some(person) = seen_advisors.intersection(&seen_examiners).next() {
        return Err(CapacityViolation::RoleOverlap { person: *person });
    }

    // Rule 2: examiner-role count bounds.
    let examiner_count = seen_examiners.len();
    if examiner_count == 0 || examiner_count > settings.max_examiners_per_event {
        return Err(CapacityViolation::ExaminerCountOutOfRange {
            count: examiner_count,
            max: settings.max_examiners_per_event,
        });
    }

    // Rule 3: committing must not push any advisor past the ceiling.
    let ceiling = settings.max_defenses_per_advisor;
    for advisor in candidate.advisors() {
        let load = loads.load(advisor);
        if load + 1 > ceiling {
            return Err(CapacityViolation::CapacityExceeded {
                person: advisor,
                load,
                ceiling,
            });
        }
    }

    Ok(())
}
