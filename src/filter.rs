//! Filtering of scan records by user, device and sample time.

use crate::models::{DateRangeQuery, ReportQuery, ScanRecord, UserDeviceQuery};

use chrono::NaiveDateTime;

/// Optional criteria narrowing a set of scan records
///
/// A record matches when it satisfies every criterion that is set. Empty user or device ids are
/// treated as unset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportFilter {
    pub user_id: Option<String>,
    pub device_id: Option<String>,
    /// Inclusive lower bound on `sampled_at`
    pub from_date: Option<NaiveDateTime>,
    /// Inclusive upper bound on `sampled_at`
    pub to_date: Option<NaiveDateTime>,
}

impl ReportFilter {
    /// Return a filter matching every record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    pub fn device(mut self, device_id: &str) -> Self {
        self.device_id = Some(device_id.to_string());
        self
    }

    pub fn from_date(mut self, from_date: NaiveDateTime) -> Self {
        self.from_date = Some(from_date);
        self
    }

    pub fn to_date(mut self, to_date: NaiveDateTime) -> Self {
        self.to_date = Some(to_date);
        self
    }

    /// Returns true if `scan` satisfies all criteria.
    pub fn matches(&self, scan: &ScanRecord) -> bool {
        fn id_matches(criterion: &Option<String>, value: &str) -> bool {
            match criterion.as_deref() {
                None | Some("") => true,
                Some(expected) => expected == value,
            }
        }

        id_matches(&self.user_id, &scan.user_id)
            && id_matches(&self.device_id, &scan.device_id)
            && self.from_date.map_or(true, |from| scan.sampled_at >= from)
            && self.to_date.map_or(true, |to| scan.sampled_at <= to)
    }

    /// Return the records matching this filter, preserving iteration order.
    pub fn apply<'a, I>(&self, scans: I) -> Vec<&'a ScanRecord>
    where
        I: IntoIterator<Item = &'a ScanRecord>,
    {
        scans.into_iter().filter(|scan| self.matches(scan)).collect()
    }
}

impl From<ReportQuery> for ReportFilter {
    fn from(query: ReportQuery) -> Self {
        ReportFilter {
            user_id: query.user_id,
            device_id: query.device_id,
            from_date: query.from_date,
            to_date: query.to_date,
        }
    }
}

impl From<DateRangeQuery> for ReportFilter {
    fn from(query: DateRangeQuery) -> Self {
        ReportFilter {
            from_date: query.from_date,
            to_date: query.to_date,
            ..Default::default()
        }
    }
}

impl From<UserDeviceQuery> for ReportFilter {
    fn from(query: UserDeviceQuery) -> Self {
        ReportFilter {
            user_id: query.user_id,
            device_id: query.device_id,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, datetime};

    fn ids(scans: &[&ScanRecord]) -> Vec<u64> {
        scans.iter().map(|scan| scan.id).collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let scans = test_utils::get_test_scans();
        let filtered = ReportFilter::new().apply(&scans);
        assert_eq!(ids(&filtered), vec![1, 2, 3]);
    }

    #[test]
    fn filter_by_user() {
        let scans = test_utils::get_test_scans();
        let filtered = ReportFilter::new().user("ariel").apply(&scans);
        assert_eq!(ids(&filtered), vec![1, 2]);
    }

    #[test]
    fn filter_by_device() {
        let scans = test_utils::get_test_scans();
        let filtered = ReportFilter::new().device("d1").apply(&scans);
        assert_eq!(ids(&filtered), vec![1, 3]);
    }

    #[test]
    fn empty_ids_are_ignored() {
        let scans = test_utils::get_test_scans();
        let filtered = ReportFilter::new().user("").device("").apply(&scans);
        assert_eq!(ids(&filtered), vec![1, 2, 3]);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let scans = test_utils::get_test_scans();
        let filtered = ReportFilter::new()
            .from_date(datetime(2025, 11, 20, 13, 2, 5))
            .to_date(datetime(2025, 11, 30, 10, 27, 33))
            .apply(&scans);
        assert_eq!(ids(&filtered), vec![1, 2]);
    }

    #[test]
    fn from_date_only() {
        let scans = test_utils::get_test_scans();
        let filtered = ReportFilter::new()
            .from_date(datetime(2025, 11, 20, 0, 0, 0))
            .apply(&scans);
        assert_eq!(ids(&filtered), vec![1, 2]);
    }

    #[test]
    fn to_date_only() {
        let scans = test_utils::get_test_scans();
        let filtered = ReportFilter::new()
            .to_date(datetime(2025, 11, 20, 23, 59, 59))
            .apply(&scans);
        assert_eq!(ids(&filtered), vec![1, 3]);
    }

    #[test]
    fn reversed_range_matches_nothing() {
        let scans = test_utils::get_test_scans();
        let filtered = ReportFilter::new()
            .from_date(datetime(2025, 12, 1, 0, 0, 0))
            .to_date(datetime(2025, 11, 1, 0, 0, 0))
            .apply(&scans);
        assert!(filtered.is_empty());
    }

    #[test]
    fn no_match_is_empty() {
        let scans = test_utils::get_test_scans();
        assert!(ReportFilter::new().user("nobody").apply(&scans).is_empty());
    }

    #[test]
    fn combined_criteria_equal_sequential_intersection() {
        let scans = test_utils::get_test_scans();
        let user = ReportFilter::new().user("ariel");
        let device = ReportFilter::new().device("d1");
        let since = ReportFilter::new().from_date(datetime(2025, 11, 14, 0, 0, 0));
        let combined = ReportFilter::new()
            .user("ariel")
            .device("d1")
            .from_date(datetime(2025, 11, 14, 0, 0, 0));

        let sequential = since.apply(device.apply(user.apply(&scans)));
        let all = combined.apply(&scans);
        assert_eq!(ids(&all), ids(&sequential));
        assert_eq!(ids(&all), vec![1]);
        // Every result is a member of the unfiltered set.
        assert!(all.iter().all(|scan| scans.contains(scan)));
    }

    #[test]
    fn from_user_device_query() {
        let query = UserDeviceQuery {
            user_id: Some("dan".to_string()),
            device_id: Some("d1".to_string()),
        };
        assert_eq!(
            ReportFilter::from(query),
            ReportFilter::new().user("dan").device("d1")
        );
    }

    #[test]
    fn from_user_device_query_without_user() {
        let query = UserDeviceQuery {
            user_id: None,
            device_id: Some("d1".to_string()),
        };
        assert_eq!(ReportFilter::from(query), ReportFilter::new().device("d1"));
    }
}
