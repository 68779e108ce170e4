use crate::conditions::{we12_expired, Condition};
use crate::types::{ClientRow, Field, JobSeeker, SiteSummary, Statistic, SummaryStats};
use chrono::NaiveDate;
use once_cell::sync::Lazy;

/// Managing-site partitions reported alongside the whole-site table.
pub const SITE_GROUPS: &[(&str, &str)] = &[("Kliea", "FHTGKL52"), ("Sylvanas", "VXJFZS75")];

/// How a catalogue entry selects records.
#[derive(Debug, Clone)]
pub enum StatKind {
    /// Section header row; no count, no drill-down.
    Header,
    /// Any record in the active caseload (COM, PND or SUS).
    Caseload,
    /// All conditions must hold (logical AND).
    Count(Vec<Condition>),
    /// Commenced with a WE12 end date more than 3 months old.
    WfdExpired,
    /// Not yet implemented in the source system; fixed at 0.
    Placeholder,
}

/// One catalogue entry: display label, optional group tag, and the
/// predicate behind both the count and the drill-down listing.
///
/// Counting and drill-down must never disagree, so there is exactly one
/// predicate per label and both passes read it from here.
#[derive(Debug, Clone)]
pub struct StatDef {
    pub label: &'static str,
    pub group: Option<&'static str>,
    pub kind: StatKind,
}

impl StatDef {
    /// Whether this entry selects `record`. Headers and placeholders select
    /// nothing.
    pub fn selects(&self, record: &JobSeeker, today: NaiveDate) -> bool {
        match &self.kind {
            StatKind::Header | StatKind::Placeholder => false,
            StatKind::Caseload => {
                matches!(record.field(Field::Status), "COM" | "PND" | "SUS")
            }
            StatKind::Count(conditions) => conditions.iter().all(|c| c.matches(record)),
            StatKind::WfdExpired => {
                record.field(Field::Status) == "COM" && we12_expired(record, today)
            }
        }
    }

    fn count(&self, data: &[JobSeeker], today: NaiveDate) -> Option<usize> {
        match &self.kind {
            StatKind::Header => None,
            StatKind::Placeholder => Some(0),
            _ => Some(data.iter().filter(|r| self.selects(r, today)).count()),
        }
    }
}

fn commenced(extra: Condition) -> StatKind {
    StatKind::Count(vec![Condition::equals(Field::Status, "COM"), extra])
}

fn def(label: &'static str, group: Option<&'static str>, kind: StatKind) -> StatDef {
    StatDef { label, group, kind }
}

// The output order is fixed and meaningful: the presentation groups rows
// under the header entries, so reordering here reorders every table.
static CATALOGUE: Lazy<Vec<StatDef>> = Lazy::new(|| {
    vec![
        def("Current Active Caseload", None, StatKind::Caseload),
        def(
            "Commenced",
            None,
            StatKind::Count(vec![Condition::equals(Field::Status, "COM")]),
        ),
        def(
            "Pending",
            None,
            StatKind::Count(vec![Condition::equals(Field::Status, "PND")]),
        ),
        def(
            "Suspended",
            None,
            StatKind::Count(vec![Condition::equals(Field::Status, "SUS")]),
        ),
        def("Total", None, StatKind::Caseload),
        def(
            "Job Seeker Servicing Type",
            Some("job-seeker-servicing-type"),
            StatKind::Header,
        ),
        def("Work for the Dole", Some("work-for-the-dole"), StatKind::Header),
        def(
            "Commenced (COM WFD Coded)",
            Some("commenced-wfd-coded"),
            commenced(Condition::equals(Field::InWfdActivityFlag, "Y")),
        ),
        def(
            "Pending (PND WFD Coded)",
            Some("pnd-wfd-coded"),
            StatKind::Count(vec![
                Condition::equals(Field::Status, "PND"),
                Condition::equals(Field::InWfdActivityFlag, "Y"),
            ]),
        ),
        def(
            "Suspended (SUS WFD Coded)",
            Some("sus-wfd-coded"),
            StatKind::Count(vec![
                Condition::equals(Field::Status, "SUS"),
                Condition::equals(Field::InWfdActivityFlag, "Y"),
            ]),
        ),
        def("WFD Expired last 3 months", Some("wfd-expired"), StatKind::WfdExpired),
        def(
            "Commenced WFD not Coded",
            Some("commenced-wfd-not-coded"),
            commenced(Condition::equals(Field::InWfdActivityFlag, "N")),
        ),
        def(
            "Suspended WFD not Coded",
            Some("suspended-wfd-not-coded"),
            StatKind::Count(vec![
                Condition::equals(Field::Status, "SUS"),
                Condition::equals(Field::InWfdActivityFlag, "N"),
            ]),
        ),
        def(
            "Commenced JSCI not updated in last 3 months",
            Some("commenced-jsci-not-updated"),
            StatKind::Placeholder,
        ),
        def(
            "Commenced Resume not updated in last 3 months",
            Some("commenced-resume-not-updated"),
            StatKind::Placeholder,
        ),
        def("Job Plans", Some("job-plans"), StatKind::Header),
        def(
            "COMMENCED JP NOT APPROVED",
            Some("job-plans-item"),
            commenced(Condition::not_equals(Field::JobPlanStatus, "A")),
        ),
        def(
            "COMMENCED AI12 CODE REQUIRED",
            Some("job-plans-item"),
            commenced(Condition::not_equals(Field::Ai12, "C")),
        ),
        def(
            "COMMENCED JS09 CODE REQUIRED",
            Some("job-plans-item"),
            commenced(Condition::not_in(Field::Js09Type, &["C", "V"])),
        ),
        def(
            "COMMENCED JS10 CODE REQUIRED",
            Some("job-plans-item"),
            commenced(Condition::not_equals(Field::Js10, "C")),
        ),
        def(
            "COMMENCED AS05 CODE REQUIRED",
            Some("job-plans-item"),
            commenced(Condition::not_equals(Field::As05, "Y")),
        ),
        def(
            "COMMENCED AS11 CODE REQUIRED",
            Some("job-plans-item"),
            commenced(Condition::not_equals(Field::As11, "Y")),
        ),
        def(
            "COMMENCED AS15 CODE REQUIRED",
            Some("job-plans-item"),
            commenced(Condition::not_equals(Field::As15, "Y")),
        ),
        def(
            "COMMENCED AS16 CODE REQUIRED",
            Some("job-plans-item"),
            commenced(Condition::not_equals(Field::As16, "Y")),
        ),
        def(
            "COMMENCED AS17 CODE REQUIRED",
            Some("job-plans-item"),
            commenced(Condition::not_equals(Field::As17, "Y")),
        ),
        def(
            "Commenced NO GOAL IN JOB PLAN",
            Some("job-plans-item"),
            commenced(Condition::equals(Field::JobPlanGoal, "")),
        ),
        def("EMPLOYMENT", Some("employment"), StatKind::Header),
        def(
            "Num of clients employed and tracked",
            Some("employment-item"),
            StatKind::Placeholder,
        ),
        def(
            "Num of clients employed not tracked",
            Some("employment-item"),
            StatKind::Placeholder,
        ),
    ]
});

/// The fixed, ordered statistic catalogue.
pub fn catalogue() -> &'static [StatDef] {
    &CATALOGUE
}

/// Compute every catalogue statistic for one record sequence.
///
/// Pure: never mutates `data`, and repeated calls with the same input yield
/// the same list. `today` is injected so the expiry check stays testable.
pub fn assemble(data: &[JobSeeker], today: NaiveDate) -> Vec<Statistic> {
    catalogue()
        .iter()
        .map(|d| Statistic {
            label: d.label,
            count: d.count(data, today),
            group: d.group,
        })
        .collect()
}

/// The records behind one statistic label, for the expanded table.
///
/// Resolves the same `StatDef` predicate the count came from; unknown
/// labels, headers and placeholders yield an empty list.
pub fn drill_down<'a>(data: &'a [JobSeeker], label: &str, today: NaiveDate) -> Vec<&'a JobSeeker> {
    match catalogue().iter().find(|d| d.label == label) {
        Some(d) => data.iter().filter(|r| d.selects(r, today)).collect(),
        None => Vec::new(),
    }
}

/// Drill-down rows ready for display.
pub fn clients(data: &[JobSeeker], label: &str, today: NaiveDate) -> Vec<ClientRow> {
    drill_down(data, label, today)
        .into_iter()
        .map(ClientRow::from)
        .collect()
}

/// Subset managed by one site code, in input order.
pub fn filter_by_site<'a>(data: &'a [JobSeeker], site_code: &str) -> Vec<&'a JobSeeker> {
    data.iter().filter(|r| r.managed_by == site_code).collect()
}

/// Owned copy of a site partition, for re-running the assembler on it.
pub fn site_partition(data: &[JobSeeker], site_code: &str) -> Vec<JobSeeker> {
    data.iter()
        .filter(|r| r.managed_by == site_code)
        .cloned()
        .collect()
}

pub fn summarize(data: &[JobSeeker]) -> SummaryStats {
    use crate::conditions::count_by_column;
    let commenced = count_by_column(data, Field::Status, "COM");
    let pending = count_by_column(data, Field::Status, "PND");
    let suspended = count_by_column(data, Field::Status, "SUS");
    let by_site = SITE_GROUPS
        .iter()
        .map(|(name, code)| {
            let subset = filter_by_site(data, code);
            let caseload = subset
                .iter()
                .filter(|r| matches!(r.field(Field::Status), "COM" | "PND" | "SUS"))
                .count();
            SiteSummary {
                site: name.to_string(),
                records: subset.len(),
                caseload,
            }
        })
        .collect();
    SummaryStats {
        total_records: data.len(),
        commenced,
        pending,
        suspended,
        total_caseload: commenced + pending + suspended,
        by_site,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn seeker(id: i64, status: &str, managed_by: &str) -> JobSeeker {
        JobSeeker {
            job_seeker_id: id,
            status: status.to_string(),
            managed_by: managed_by.to_string(),
            ..JobSeeker::default()
        }
    }

    fn sample() -> Vec<JobSeeker> {
        let mut a = seeker(1, "COM", "FHTGKL52");
        a.in_wfd_activity_flag = "Y".to_string();
        a.we12_end_date = "2024-02-10".to_string();
        let mut b = seeker(2, "COM", "FHTGKL52");
        b.in_wfd_activity_flag = "N".to_string();
        b.job_plan_goal = "Warehouse placement".to_string();
        let mut c = seeker(3, "PND", "VXJFZS75");
        c.in_wfd_activity_flag = "Y".to_string();
        let d = seeker(4, "SUS", "VXJFZS75");
        let e = seeker(5, "EXT", "VXJFZS75");
        vec![a, b, c, d, e]
    }

    fn count_of(stats: &[Statistic], label: &str) -> Option<usize> {
        stats.iter().find(|s| s.label == label).unwrap().count
    }

    #[test]
    fn catalogue_order_starts_with_the_caseload_block() {
        let labels: Vec<&str> = catalogue().iter().map(|d| d.label).collect();
        assert_eq!(
            &labels[..7],
            &[
                "Current Active Caseload",
                "Commenced",
                "Pending",
                "Suspended",
                "Total",
                "Job Seeker Servicing Type",
                "Work for the Dole",
            ]
        );
        assert_eq!(*labels.last().unwrap(), "Num of clients employed not tracked");
    }

    #[test]
    fn caseload_counts_exclude_other_statuses() {
        let stats = assemble(&sample(), today());
        assert_eq!(count_of(&stats, "Current Active Caseload"), Some(4));
        assert_eq!(count_of(&stats, "Commenced"), Some(2));
        assert_eq!(count_of(&stats, "Pending"), Some(1));
        assert_eq!(count_of(&stats, "Suspended"), Some(1));
        assert_eq!(count_of(&stats, "Total"), Some(4));
    }

    #[test]
    fn headers_have_no_count_and_placeholders_are_zero() {
        let stats = assemble(&sample(), today());
        assert_eq!(count_of(&stats, "Job Plans"), None);
        assert_eq!(count_of(&stats, "EMPLOYMENT"), None);
        assert_eq!(count_of(&stats, "Num of clients employed and tracked"), Some(0));
        assert_eq!(
            count_of(&stats, "Commenced JSCI not updated in last 3 months"),
            Some(0)
        );
    }

    #[test]
    fn wfd_expired_requires_commenced_status() {
        let mut data = sample();
        // A suspended record with an old end date must not count.
        data[3].we12_end_date = "2023-01-01".to_string();
        let stats = assemble(&data, today());
        assert_eq!(count_of(&stats, "WFD Expired last 3 months"), Some(1));
    }

    #[test]
    fn blank_goal_counts_under_no_goal_in_job_plan() {
        let stats = assemble(&sample(), today());
        // Record 1 is COM with no goal; record 2 is COM with a goal.
        assert_eq!(count_of(&stats, "Commenced NO GOAL IN JOB PLAN"), Some(1));
    }

    #[test]
    fn empty_input_yields_zero_everywhere() {
        let stats = assemble(&[], today());
        for stat in &stats {
            match stat.count {
                None => {}
                Some(n) => assert_eq!(n, 0, "{} should be zero on empty input", stat.label),
            }
            assert!(drill_down(&[], stat.label, today()).is_empty());
        }
    }

    #[test]
    fn assemble_is_idempotent() {
        let data = sample();
        assert_eq!(assemble(&data, today()), assemble(&data, today()));
    }

    #[test]
    fn drill_down_count_matches_assembled_count() {
        let data = sample();
        let stats = assemble(&data, today());
        for (def, stat) in catalogue().iter().zip(&stats) {
            let listed = drill_down(&data, def.label, today()).len();
            match &def.kind {
                StatKind::Header => assert_eq!(listed, 0),
                StatKind::Placeholder => assert_eq!(listed, 0),
                _ => assert_eq!(Some(listed), stat.count, "label {}", def.label),
            }
        }
    }

    #[test]
    fn unknown_label_drills_to_nothing() {
        assert!(drill_down(&sample(), "No Such Statistic", today()).is_empty());
    }

    #[test]
    fn site_partitions_are_additive() {
        let data = sample();
        let kliea = site_partition(&data, "FHTGKL52");
        let sylvanas = site_partition(&data, "VXJFZS75");
        assert_eq!(kliea.len() + sylvanas.len(), data.len());

        let whole = assemble(&data, today());
        let left = assemble(&kliea, today());
        let right = assemble(&sylvanas, today());
        for ((w, l), r) in whole.iter().zip(&left).zip(&right) {
            if let (Some(wc), Some(lc), Some(rc)) = (w.count, l.count, r.count) {
                let def = catalogue().iter().find(|d| d.label == w.label).unwrap();
                if matches!(def.kind, StatKind::Placeholder) {
                    continue;
                }
                assert_eq!(lc + rc, wc, "label {}", w.label);
            }
        }
    }

    #[test]
    fn clients_expose_the_three_display_columns() {
        let rows = clients(&sample(), "Commenced WFD not Coded", today());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].job_seeker_id, 2);
    }

    #[test]
    fn summary_breaks_caseload_down_by_site() {
        let summary = summarize(&sample());
        assert_eq!(summary.total_records, 5);
        assert_eq!(summary.total_caseload, 4);
        assert_eq!(summary.by_site.len(), 2);
        assert_eq!(summary.by_site[0].site, "Kliea");
        assert_eq!(summary.by_site[0].caseload, 2);
        assert_eq!(summary.by_site[1].records, 3);
        assert_eq!(summary.by_site[1].caseload, 2);
    }
}
