//! Time-range rules shared by trips and activities.
//!
//! Both entities carry a start and an end instant that must stay ordered
//! (`start <= end`). Partial updates may move one endpoint at a time, in
//! which case the moved endpoint is checked against the stored opposite one.

use chrono::{DateTime, Utc};

use super::{Error, FieldError, Patch};

/// Wire names and messages for one kind of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRule {
    /// Field name of the start endpoint.
    pub start_field: &'static str,
    /// Field name of the end endpoint.
    pub end_field: &'static str,
    /// Message when a complete range is out of order.
    pub order_message: &'static str,
    /// Message when a single moved endpoint crosses the stored other one.
    pub original_range_message: &'static str,
}

/// Trip date range.
pub const TRIP_DATES: RangeRule = RangeRule {
    start_field: "startDate",
    end_field: "endDate",
    order_message: "Start date must be before end date",
    original_range_message: "Start date and end date must be within the original range",
};

/// Activity time range.
pub const ACTIVITY_TIMES: RangeRule = RangeRule {
    start_field: "startTime",
    end_field: "endTime",
    order_message: "Start time cannot be later than end time",
    original_range_message: "Start time and end time must be within the original range",
};

impl RangeRule {
    fn range_error(&self, message: &'static str) -> Error {
        Error::validation(
            message,
            vec![
                FieldError::new(self.start_field, "range", message),
                FieldError::new(self.end_field, "range", message),
            ],
        )
    }

    /// Reject `start > end`. Equal endpoints are allowed.
    pub fn check(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), Error> {
        if start > end {
            return Err(self.range_error(self.order_message));
        }
        Ok(())
    }

    /// Merge a partial update into the stored range and validate the result.
    ///
    /// Returns the merged `(start, end)` pair.
    pub fn merge(
        &self,
        stored: (DateTime<Utc>, DateTime<Utc>),
        start: Patch<DateTime<Utc>>,
        end: Patch<DateTime<Utc>>,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), Error> {
        let (stored_start, stored_end) = stored;
        match (start, end) {
            (Patch::Absent, Patch::Absent) => Ok(stored),
            (Patch::Present(start), Patch::Present(end)) => {
                self.check(start, end)?;
                Ok((start, end))
            }
            (Patch::Present(start), Patch::Absent) => {
                if start > stored_end {
                    return Err(self.range_error(self.original_range_message));
                }
                Ok((start, stored_end))
            }
            (Patch::Absent, Patch::Present(end)) => {
                if end < stored_start {
                    return Err(self.range_error(self.original_range_message));
                }
                Ok((stored_start, end))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 12, d, 0, 0, 0).single().expect("valid date")
    }

    #[rstest]
    #[case(1, 10, true)]
    #[case(5, 5, true)]
    #[case(10, 1, false)]
    fn check_orders_endpoints(#[case] start: u32, #[case] end: u32, #[case] ok: bool) {
        assert_eq!(TRIP_DATES.check(day(start), day(end)).is_ok(), ok);
    }

    #[rstest]
    #[case(Patch::Present(day(11)), Patch::Absent)]
    #[case(Patch::Absent, Patch::Present(day(2)))]
    fn one_sided_move_cannot_cross_stored_endpoint(
        #[case] start: Patch<DateTime<Utc>>,
        #[case] end: Patch<DateTime<Utc>>,
    ) {
        let err = TRIP_DATES
            .merge((day(5), day(10)), start, end)
            .expect_err("crossing endpoint");
        assert_eq!(err.message(), TRIP_DATES.original_range_message);
    }

    #[rstest]
    fn one_sided_move_within_range_is_merged() {
        let merged = ACTIVITY_TIMES
            .merge((day(5), day(10)), Patch::Present(day(7)), Patch::Absent)
            .expect("valid move");
        assert_eq!(merged, (day(7), day(10)));
    }

    #[rstest]
    fn both_endpoints_replace_whole_range() {
        let merged = TRIP_DATES
            .merge((day(5), day(10)), Patch::Present(day(12)), Patch::Present(day(20)))
            .expect("valid replacement");
        assert_eq!(merged, (day(12), day(20)));

        let err = TRIP_DATES
            .merge((day(5), day(10)), Patch::Present(day(20)), Patch::Present(day(12)))
            .expect_err("reversed range");
        assert_eq!(err.message(), TRIP_DATES.order_message);
    }
}
