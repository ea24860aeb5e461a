//! Candidate slot enumeration.
//!
//! Walks a working day per room, producing `(room, date, start, end)` tuples
//! from the period's scheduling settings: day start/end, defense duration,
//! the gap between consecutive defenses, breaks, and holidays. Holidays
//! yield no slots at all.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::api::RoomId;
use crate::config::SchedulingSettings;
use crate::models::event::TimeSlot;

/// Enumerate every candidate slot for one date across the given rooms.
///
/// A slot ending exactly at a break start jumps past the break instead of
/// inserting the usual gap; otherwise consecutive slots in a room are
/// separated by `gap_minutes`.
pub fn generate_slots(
    date: NaiveDate,
    rooms: &[RoomId],
    settings: &SchedulingSettings,
) -> Vec<TimeSlot> {
    if settings.is_holiday(date) {
        return Vec::new();
    }

    // The walk runs in u32: the settings are u16 values a config file can
    // push to their maximum, and summing them must not wrap.
    let start_minutes = u32::from(settings.day_start.minutes());
    let end_minutes = u32::from(settings.day_end.minutes());
    let duration = u32::from(settings.defense_duration_minutes);
    let step = duration + u32::from(settings.gap_minutes);
    if duration == 0 {
        return Vec::new();
    }

    // Break windows keyed by the minute a slot would have to end on.
    let break_at: HashMap<u32, u32> = settings
        .breaks
        .iter()
        .map(|b| (u32::from(b.at.minutes()), u32::from(b.duration_minutes)))
        .collect();

    let mut slots = Vec::new();
    for &room in rooms {
        let mut current = start_minutes;
        while current + duration <= end_minutes {
            let slot_end = current + duration;
            // Both bounds fit u16: they are at most end_minutes, a ClockTime.
            let (Some(start), Some(end)) = (
                crate::models::time::ClockTime::from_minutes(current as u16),
                crate::models::time::ClockTime::from_minutes(slot_end as u16),
            ) else {
                break;
            };
            slots.push(TimeSlot {
                room,
                date,
                start,
                end,
            });

            current = match break_at.get(&slot_end) {
                Some(break_minutes) => slot_end + break_minutes,
                None => current + step,
            };
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time::ClockTime;

    fn settings() -> SchedulingSettings {
        let mut s = SchedulingSettings::default();
        s.day_start = ClockTime::from_hm(8, 0).unwrap();
        s.day_end = ClockTime::from_hm(12, 0).unwrap();
        s.defense_duration_minutes = 90;
        s.gap_minutes = 30;
        s.breaks = vec![];
        s
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
    }

    #[test]
    fn test_walk_respects_day_end() {
        let slots = generate_slots(monday(), &[RoomId::new(1)], &settings());
        // 08:00-09:30, then 10:00-11:30; 12:00-13:30 would pass day end.
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start.to_string(), "08:00");
        assert_eq!(slots[0].end.to_string(), "09:30");
        assert_eq!(slots[1].start.to_string(), "10:00");
        assert_eq!(slots[1].end.to_string(), "11:30");
    }

    #[test]
    fn test_slots_per_room() {
        let rooms = [RoomId::new(1), RoomId::new(2), RoomId::new(3)];
        let slots = generate_slots(monday(), &rooms, &settings());
        assert_eq!(slots.len(), 6);
        assert_eq!(slots.iter().filter(|s| s.room == rooms[2]).count(), 2);
    }

    #[test]
    fn test_holiday_yields_nothing() {
        // Default settings mark Saturday as a weekly holiday.
        let saturday = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
        let slots = generate_slots(saturday, &[RoomId::new(1)], &SchedulingSettings::default());
        assert!(slots.is_empty());

        let mut s = settings();
        s.special_holidays = vec![monday()];
        assert!(generate_slots(monday(), &[RoomId::new(1)], &s).is_empty());
    }

    #[test]
    fn test_extreme_settings_yield_nothing() {
        // A configured duration near the u16 ceiling must not wrap the walk.
        let mut s = settings();
        s.defense_duration_minutes = u16::MAX;
        assert!(generate_slots(monday(), &[RoomId::new(1)], &s).is_empty());

        let mut s = settings();
        s.gap_minutes = u16::MAX;
        let slots = generate_slots(monday(), &[RoomId::new(1)], &s);
        assert_eq!(slots.len(), 1);

        // A zero duration would never advance the walk.
        let mut s = settings();
        s.defense_duration_minutes = 0;
        assert!(generate_slots(monday(), &[RoomId::new(1)], &s).is_empty());
    }

    #[test]
    fn test_break_pushes_next_slot() {
        let mut s = SchedulingSettings::default();
        s.day_start = ClockTime::from_hm(8, 0).unwrap();
        s.day_end = ClockTime::from_hm(16, 0).unwrap();
        s.defense_duration_minutes = 120;
        s.gap_minutes = 0;
        s.breaks = vec![crate::config::BreakWindow {
            at: ClockTime::from_hm(12, 0).unwrap(),
            duration_minutes: 60,
        }];

        let slots = generate_slots(monday(), &[RoomId::new(1)], &s);
        // 08:00-10:00, 10:00-12:00, break to 13:00, 13:00-15:00.
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[2].start.to_string(), "13:00");
        assert_eq!(slots[2].end.to_string(), "15:00");
    }
}
