use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Fixed daily report slots, each firing at most once per day.
///
/// Pure over wall-clock input so the firing rules are testable without a
/// clock: a slot is due once `now` passes it and it has not fired on
/// `now`'s date yet. The per-day flag makes an overlapping poll tick a
/// no-op, and the date comparison resets every slot at midnight. Slots
/// already past at construction are treated as fired: an occurrence missed
/// while the process was down is skipped, never replayed.
pub struct ReportSchedule {
    slots: Vec<NaiveTime>,
    fired: Vec<Option<NaiveDate>>,
}

impl ReportSchedule {
    pub fn new(slots: Vec<NaiveTime>, now: NaiveDateTime) -> Self {
        let fired = slots
            .iter()
            .map(|slot| (now.time() >= *slot).then(|| now.date()))
            .collect();
        Self { slots, fired }
    }

    /// Number of slot occurrences that became due at `now`, marking each
    /// as fired for the day.
    pub fn due(&mut self, now: NaiveDateTime) -> usize {
        let mut count = 0;
        for (slot, fired) in self.slots.iter().zip(self.fired.iter_mut()) {
            if now.time() >= *slot && *fired != Some(now.date()) {
                *fired = Some(now.date());
                count += 1;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn slots() -> Vec<NaiveTime> {
        ["10:00", "12:00", "15:00", "17:00"]
            .iter()
            .map(|t| NaiveTime::parse_from_str(t, "%H:%M").unwrap())
            .collect()
    }

    fn at(day: u32, time: &str) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, day)
            .unwrap()
            .and_time(NaiveTime::parse_from_str(time, "%H:%M").unwrap())
    }

    #[test]
    fn slots_already_past_at_startup_are_skipped() {
        let mut sched = ReportSchedule::new(slots(), at(26, "13:00"));
        assert_eq!(sched.due(at(26, "13:01")), 0);
        assert_eq!(sched.due(at(26, "15:00")), 1);
    }

    #[test]
    fn fires_once_per_slot_per_day() {
        let mut sched = ReportSchedule::new(slots(), at(26, "09:00"));
        assert_eq!(sched.due(at(26, "09:59")), 0);
        assert_eq!(sched.due(at(26, "10:00")), 1);
        // Overlapping poll ticks do not double-fire.
        assert_eq!(sched.due(at(26, "10:00")), 0);
        assert_eq!(sched.due(at(26, "10:01")), 0);
        assert_eq!(sched.due(at(26, "12:30")), 1);
    }

    #[test]
    fn flags_reset_at_midnight() {
        let mut sched = ReportSchedule::new(slots(), at(26, "09:00"));
        assert_eq!(sched.due(at(26, "17:30")), 4);
        assert_eq!(sched.due(at(26, "23:59")), 0);
        assert_eq!(sched.due(at(27, "10:00")), 1);
        assert_eq!(sched.due(at(27, "12:00")), 1);
    }
}
