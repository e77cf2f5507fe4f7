use chrono::{DateTime, Utc};
use langop_domain::{Condition, ConditionStatus};

/// Apply the status-condition algebra (§4.2): upsert a condition by `type_`,
/// only bumping `last_transition_time` when `status` actually changed.
/// `reason`/`message`/`observed_generation` are always refreshed, even when
/// the status itself didn't change, so a condition's text stays in sync with
/// the generation that produced it.
pub fn set_condition(
    conditions: &mut Vec<Condition>,
    type_: &str,
    status: ConditionStatus,
    reason: &str,
    message: &str,
    observed_generation: u64,
    now: DateTime<Utc>,
) {
    if let Some(existing) = conditions.iter_mut().find(|c| c.type_ == type_) {
        if existing.status != status {
            existing.last_transition_time = now;
        }
        existing.status = status;
        existing.reason = reason.to_string();
        existing.message = message.to_string();
        existing.observed_generation = observed_generation;
        return;
    }

    conditions.push(Condition {
        type_: type_.to_string(),
        status,
        reason: reason.to_string(),
        message: message.to_string(),
        last_transition_time: now,
        observed_generation,
    });
}

/// Look up a condition's status by type, e.g. to gate readiness on `Ready=True`.
pub fn condition_status(conditions: &[Condition], type_: &str) -> Option<ConditionStatus> {
    conditions.iter().find(|c| c.type_ == type_).map(|c| c.status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn new_condition_is_appended() {
        let mut conditions = Vec::new();
        set_condition(&mut conditions, "Ready", ConditionStatus::True, "AllUp", "ready", 1, t(0));
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].status, ConditionStatus::True);
    }

    #[test]
    fn unchanged_status_does_not_bump_transition_time() {
        let mut conditions = Vec::new();
        set_condition(&mut conditions, "Ready", ConditionStatus::True, "AllUp", "ready", 1, t(0));
        set_condition(&mut conditions, "Ready", ConditionStatus::True, "StillUp", "still ready", 2, t(100));

        assert_eq!(conditions[0].last_transition_time, t(0));
        assert_eq!(conditions[0].reason, "StillUp");
        assert_eq!(conditions[0].observed_generation, 2);
    }

    #[test]
    fn changed_status_bumps_transition_time() {
        let mut conditions = Vec::new();
        set_condition(&mut conditions, "Ready", ConditionStatus::True, "AllUp", "ready", 1, t(0));
        set_condition(&mut conditions, "Ready", ConditionStatus::False, "Degraded", "one pod down", 2, t(100));

        assert_eq!(conditions[0].status, ConditionStatus::False);
        assert_eq!(conditions[0].last_transition_time, t(100));
    }

    #[test]
    fn distinct_types_are_independent() {
        let mut conditions = Vec::new();
        set_condition(&mut conditions, "Ready", ConditionStatus::True, "AllUp", "ready", 1, t(0));
        set_condition(&mut conditions, "Progressing", ConditionStatus::False, "Idle", "nothing in flight", 1, t(0));
        assert_eq!(conditions.len(), 2);
    }
}
