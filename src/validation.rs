use chrono::NaiveDate;
use derive_more::Display;

use crate::model::leave_request::{LeaveType, NewLeaveRequest};

/// Vacation must be requested at least this many days ahead.
pub const VACATION_MIN_LEAD_DAYS: i64 = 3;
/// Longest vacation, in calendar days counted inclusively.
pub const VACATION_MAX_DAYS: i64 = 2;

/// First business rule a leave request breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ValidationError {
    #[display(fmt = "End date cannot be earlier than start date")]
    EndBeforeStart,
    #[display(fmt = "Backdated leave is not allowed")]
    PastStartDate,
    #[display(
        fmt = "Vacation leave must be requested at least {} days in advance (requested {} days ahead)",
        VACATION_MIN_LEAD_DAYS,
        lead_days
    )]
    InsufficientLeadTime { lead_days: i64 },
    #[display(
        fmt = "Vacation leave cannot exceed {} consecutive days (requested {})",
        VACATION_MAX_DAYS,
        days
    )]
    VacationTooLong { days: i64 },
}

impl std::error::Error for ValidationError {}

/// Checks a candidate against the leave rules as of `today`.
///
/// Rules run in a fixed order and the first violation wins:
/// end before start, start in the past, then for vacation only the lead time
/// and the length cap. Dates are calendar days, so a request starting today
/// is accepted and day counts are exact.
pub fn validate(candidate: &NewLeaveRequest, today: NaiveDate) -> Result<(), ValidationError> {
    let start = candidate.start_date;
    let end = candidate.end_date;

    if end < start {
        return Err(ValidationError::EndBeforeStart);
    }

    if start < today {
        return Err(ValidationError::PastStartDate);
    }

    if candidate.leave_type == LeaveType::Vacation {
        let lead_days = (start - today).num_days();
        if lead_days < VACATION_MIN_LEAD_DAYS {
            return Err(ValidationError::InsufficientLeadTime { lead_days });
        }

        let days = (end - start).num_days() + 1;
        if days > VACATION_MAX_DAYS {
            return Err(ValidationError::VacationTooLong { days });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn candidate(leave_type: LeaveType, start: &str, end: &str) -> NewLeaveRequest {
        NewLeaveRequest {
            full_name: "Somchai Jaidee".into(),
            department_position: String::new(),
            email: String::new(),
            phone: "0812345678".into(),
            leave_type,
            reason: "family".into(),
            start_date: date(start),
            end_date: date(end),
        }
    }

    #[test]
    fn end_before_start_is_rejected_for_every_type() {
        let today = date("2025-06-01");
        for leave_type in [
            LeaveType::Sick,
            LeaveType::Personal,
            LeaveType::Vacation,
            LeaveType::Other,
        ] {
            let c = candidate(leave_type, "2025-06-10", "2025-06-09");
            assert_eq!(validate(&c, today), Err(ValidationError::EndBeforeStart));
        }
    }

    #[test]
    fn start_before_today_is_rejected() {
        let c = candidate(LeaveType::Sick, "2025-06-09", "2025-06-09");
        assert_eq!(
            validate(&c, date("2025-06-10")),
            Err(ValidationError::PastStartDate)
        );
    }

    #[test]
    fn ordering_is_checked_before_backdating() {
        let c = candidate(LeaveType::Other, "2025-06-05", "2025-06-04");
        assert_eq!(
            validate(&c, date("2025-06-10")),
            Err(ValidationError::EndBeforeStart)
        );
    }

    #[test]
    fn vacation_needs_three_days_lead() {
        let today = date("2025-06-10");
        let c = candidate(LeaveType::Vacation, "2025-06-11", "2025-06-11");
        assert_eq!(
            validate(&c, today),
            Err(ValidationError::InsufficientLeadTime { lead_days: 1 })
        );

        let c = candidate(LeaveType::Vacation, "2025-06-12", "2025-06-12");
        assert_eq!(
            validate(&c, today),
            Err(ValidationError::InsufficientLeadTime { lead_days: 2 })
        );
    }

    #[test]
    fn vacation_longer_than_two_days_is_rejected() {
        let c = candidate(LeaveType::Vacation, "2025-06-15", "2025-06-18");
        assert_eq!(
            validate(&c, date("2025-06-10")),
            Err(ValidationError::VacationTooLong { days: 4 })
        );
    }

    #[test]
    fn lead_time_is_checked_before_length() {
        let c = candidate(LeaveType::Vacation, "2025-06-11", "2025-06-20");
        assert!(matches!(
            validate(&c, date("2025-06-10")),
            Err(ValidationError::InsufficientLeadTime { .. })
        ));
    }

    #[test]
    fn vacation_within_limits_passes() {
        let c = candidate(LeaveType::Vacation, "2025-06-13", "2025-06-14");
        assert_eq!(validate(&c, date("2025-06-10")), Ok(()));
    }

    #[test]
    fn other_types_skip_vacation_rules() {
        let today = date("2025-06-10");
        let c = candidate(LeaveType::Sick, "2025-06-10", "2025-06-10");
        assert_eq!(validate(&c, today), Ok(()));

        let c = candidate(LeaveType::Personal, "2025-06-10", "2025-06-30");
        assert_eq!(validate(&c, today), Ok(()));
    }

    #[test]
    fn messages_are_distinct() {
        let messages = [
            ValidationError::EndBeforeStart.to_string(),
            ValidationError::PastStartDate.to_string(),
            ValidationError::InsufficientLeadTime { lead_days: 0 }.to_string(),
            ValidationError::VacationTooLong { days: 5 }.to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
