//! Bookkeeping for the question in flight and the timers around it.

use chrono::{DateTime, TimeDelta, Utc};

/// A user who answered the current question correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    /// Host user id.
    pub user_id: String,
    /// Name shown in chat.
    pub display_name: String,
}

/// The outcome of a finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Pool index of the resolved question.
    pub index: usize,
    /// Total reward of the round.
    pub reward: u64,
    /// Winners in answer order.
    pub winners: Vec<Winner>,
}

/// Round timers and the in-flight question.
///
/// `current` is set exactly while a question is active. Indexes refer to the
/// filtered pool of the question store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    current: Option<usize>,
    previous: Option<usize>,
    reward: u64,
    expiry_time: DateTime<Utc>,
    next_round_time: DateTime<Utc>,
    winners: Vec<Winner>,
    grace_armed: bool,
    ready_for_next: bool,
}

impl RoundState {
    /// An idle state whose first round is due at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            current: None,
            previous: None,
            reward: 0,
            expiry_time: now,
            next_round_time: now,
            winners: Vec::new(),
            grace_armed: false,
            ready_for_next: true,
        }
    }

    /// Pool index of the active question.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Pool index of the last resolved question.
    pub fn previous(&self) -> Option<usize> {
        self.previous
    }

    /// Whether a question is in flight.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Reward of the active round.
    pub fn reward(&self) -> u64 {
        self.reward
    }

    /// When the active question expires.
    pub fn expiry_time(&self) -> DateTime<Utc> {
        self.expiry_time
    }

    /// When the next question is due.
    pub fn next_round_time(&self) -> DateTime<Utc> {
        self.next_round_time
    }

    /// Winners so far, in answer order.
    pub fn winners(&self) -> &[Winner] {
        &self.winners
    }

    /// Whether the grace period has been armed this round.
    pub fn grace_armed(&self) -> bool {
        self.grace_armed
    }

    /// Whether a manual start is allowed.
    pub fn ready_for_next(&self) -> bool {
        self.ready_for_next
    }

    /// Begin a round on `index`.
    pub fn begin(&mut self, index: usize, reward: u64, expiry: DateTime<Utc>) {
        self.current = Some(index);
        self.reward = reward;
        self.expiry_time = expiry;
        self.winners.clear();
        self.grace_armed = false;
        self.ready_for_next = false;
    }

    /// Record a winner. Returns false if they had already won this round.
    pub fn admit(&mut self, user_id: &str, display_name: &str) -> bool {
        if self.winners.iter().any(|w| w.user_id == user_id) {
            return false;
        }
        self.winners.push(Winner {
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
        });
        true
    }

    /// Arm the grace period. Only the first call per round takes effect.
    ///
    /// The grace deadline can only bring the expiry forward.
    pub fn arm_grace(&mut self, deadline: DateTime<Utc>) -> bool {
        if self.grace_armed {
            return false;
        }
        self.grace_armed = true;
        self.expiry_time = self.expiry_time.min(deadline);
        true
    }

    /// Resolve the active round and schedule the next one.
    pub fn finish(&mut self, next_round: DateTime<Utc>) -> Option<Resolution> {
        let index = self.current.take()?;
        self.previous = Some(index);
        self.grace_armed = false;
        self.ready_for_next = false;
        self.next_round_time = next_round;
        Some(Resolution {
            index,
            reward: self.reward,
            winners: std::mem::take(&mut self.winners),
        })
    }

    /// Drop the active round without resolving it.
    pub fn abandon(&mut self) {
        if let Some(index) = self.current.take() {
            self.previous = Some(index);
        }
        self.winners.clear();
        self.grace_armed = false;
    }

    /// Push the next round back to `until`.
    pub fn defer(&mut self, until: DateTime<Utc>) {
        self.next_round_time = until;
    }

    /// Allow a manual start.
    pub fn mark_ready(&mut self) {
        self.ready_for_next = true;
    }

    /// Move the expiry of the active question.
    pub fn shift_expiry(&mut self, delta: TimeDelta) {
        self.expiry_time = offset(self.expiry_time, delta);
    }

    /// Move the next round deadline.
    pub fn shift_next_round(&mut self, delta: TimeDelta) {
        self.next_round_time = offset(self.next_round_time, delta);
    }

    /// Fix up indexes after pool entry `removed` is deleted.
    ///
    /// Returns true if the active question was the one removed, in which case
    /// the round is dropped.
    pub fn question_removed(&mut self, removed: usize) -> bool {
        self.previous = match self.previous {
            Some(p) if p == removed => None,
            Some(p) if p > removed => Some(p - 1),
            other => other,
        };
        match self.current {
            Some(c) if c == removed => {
                self.current = None;
                self.winners.clear();
                self.grace_armed = false;
                true
            }
            Some(c) if c > removed => {
                self.current = Some(c - 1);
                false
            }
            _ => false,
        }
    }
}

/// `at + delta`, saturating at the ends of the representable range.
pub fn offset(at: DateTime<Utc>, delta: TimeDelta) -> DateTime<Utc> {
    at.checked_add_signed(delta).unwrap_or(if delta < TimeDelta::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Names of the winners, sorted for announcement.
///
/// The order is plain code point order, so capitals come first.
pub fn sorted_names(winners: &[Winner]) -> Vec<String> {
    let mut names: Vec<String> = winners.iter().map(|w| w.display_name.clone()).collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn new_state_is_idle_and_ready() {
        let r = RoundState::new(t0());
        assert!(!r.is_active());
        assert!(r.ready_for_next());
        assert_eq!(r.next_round_time(), t0());
    }

    #[test]
    fn begin_and_finish() {
        let mut r = RoundState::new(t0());
        r.begin(2, 15, t0() + TimeDelta::minutes(5));
        assert_eq!(r.current(), Some(2));
        assert!(!r.ready_for_next());
        assert!(r.admit("u1", "Ann"));
        assert!(!r.admit("u1", "Ann"));

        let next = t0() + TimeDelta::minutes(10);
        let res = r.finish(next).unwrap();
        assert_eq!(res.index, 2);
        assert_eq!(res.reward, 15);
        assert_eq!(res.winners.len(), 1);
        assert!(!r.is_active());
        assert_eq!(r.previous(), Some(2));
        assert!(r.winners().is_empty());
        assert_eq!(r.next_round_time(), next);
    }

    #[test]
    fn finish_when_idle_is_none() {
        let mut r = RoundState::new(t0());
        assert_eq!(r.finish(t0()), None);
    }

    #[test]
    fn grace_arms_once_and_never_extends() {
        let mut r = RoundState::new(t0());
        r.begin(0, 10, t0() + TimeDelta::minutes(5));
        assert!(r.arm_grace(t0() + TimeDelta::seconds(5)));
        assert_eq!(r.expiry_time(), t0() + TimeDelta::seconds(5));
        assert!(!r.arm_grace(t0() + TimeDelta::seconds(2)));
        assert_eq!(r.expiry_time(), t0() + TimeDelta::seconds(5));

        r.begin(0, 10, t0() + TimeDelta::seconds(3));
        assert!(r.arm_grace(t0() + TimeDelta::seconds(10)));
        assert_eq!(r.expiry_time(), t0() + TimeDelta::seconds(3));
    }

    #[test]
    fn removal_fixes_indexes() {
        let mut r = RoundState::new(t0());
        r.begin(3, 10, t0());
        r.finish(t0());
        r.begin(5, 10, t0());
        assert!(!r.question_removed(1));
        assert_eq!(r.current(), Some(4));
        assert_eq!(r.previous(), Some(2));

        assert!(r.question_removed(4));
        assert!(!r.is_active());
        assert_eq!(r.previous(), Some(2));

        r.question_removed(2);
        assert_eq!(r.previous(), None);
    }

    #[test]
    fn abandon_keeps_timers() {
        let mut r = RoundState::new(t0());
        r.begin(1, 10, t0() + TimeDelta::minutes(1));
        r.admit("u", "U");
        r.abandon();
        assert!(!r.is_active());
        assert_eq!(r.previous(), Some(1));
        assert!(r.winners().is_empty());
    }

    #[test]
    fn shifts() {
        let mut r = RoundState::new(t0());
        r.shift_next_round(TimeDelta::minutes(2));
        assert_eq!(r.next_round_time(), t0() + TimeDelta::minutes(2));
        r.begin(0, 1, t0());
        r.shift_expiry(TimeDelta::seconds(-30));
        assert_eq!(r.expiry_time(), t0() - TimeDelta::seconds(30));
    }

    #[test]
    fn shifts_saturate() {
        let mut r = RoundState::new(t0());
        r.shift_next_round(TimeDelta::MAX);
        assert_eq!(r.next_round_time(), DateTime::<Utc>::MAX_UTC);
        r.begin(0, 1, t0());
        r.shift_expiry(TimeDelta::MIN);
        assert_eq!(r.expiry_time(), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn offset_adds_in_range() {
        assert_eq!(offset(t0(), TimeDelta::seconds(90)), t0() + TimeDelta::seconds(90));
        assert_eq!(offset(t0(), TimeDelta::MAX), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn names_sorted_capitals_first() {
        let winners: Vec<Winner> = ["bob", "Cid", "Ann"]
            .iter()
            .map(|n| Winner {
                user_id: n.to_string(),
                display_name: n.to_string(),
            })
            .collect();
        assert_eq!(sorted_names(&winners), vec!["Ann", "Cid", "bob"]);
    }
}
