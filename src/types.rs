use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One job seeker from the SUB216 export.
///
/// The export carries well over a hundred columns; we only keep the fields
/// the statistics and drill-down tables actually read. serde ignores the
/// rest, and `#[serde(default)]` means an absent field deserializes to the
/// empty string, which the condition engine treats as "not set".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobSeeker {
    #[serde(rename = "JOB_SEEKER_ID")]
    pub job_seeker_id: i64,
    #[serde(rename = "FIRST_GIVEN_NAME")]
    pub first_given_name: String,
    #[serde(rename = "FAMILY_NAME")]
    pub family_name: String,
    #[serde(rename = "STATUS")]
    pub status: String,
    #[serde(rename = "IN_WFD_ACTIVITY_FLAG")]
    pub in_wfd_activity_flag: String,
    #[serde(rename = "MANAGED_BY")]
    pub managed_by: String,
    #[serde(rename = "WE12_END_DATE")]
    pub we12_end_date: String,
    #[serde(rename = "JOB_PLAN_STATUS")]
    pub job_plan_status: String,
    #[serde(rename = "AI12")]
    pub ai12: String,
    #[serde(rename = "JS09_TYPE")]
    pub js09_type: String,
    #[serde(rename = "JS10")]
    pub js10: String,
    #[serde(rename = "AS05")]
    pub as05: String,
    #[serde(rename = "AS11")]
    pub as11: String,
    #[serde(rename = "AS15")]
    pub as15: String,
    #[serde(rename = "AS16")]
    pub as16: String,
    #[serde(rename = "AS17")]
    pub as17: String,
    // Some extracts spell this one in mixed case.
    #[serde(rename = "JOB_PLAN_GOAL", alias = "Job_Plan_Goal")]
    pub job_plan_goal: String,
}

/// Closed set of fields a condition may address.
///
/// Conditions go through this enum rather than a column-name string so a
/// typo in a statistic definition fails to compile instead of silently
/// counting zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Status,
    InWfdActivityFlag,
    ManagedBy,
    We12EndDate,
    JobPlanStatus,
    Ai12,
    Js09Type,
    Js10,
    As05,
    As11,
    As15,
    As16,
    As17,
    JobPlanGoal,
}

impl JobSeeker {
    /// Typed field accessor. Absent fields were defaulted to `""` at load
    /// time, so every lookup returns a value.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Status => &self.status,
            Field::InWfdActivityFlag => &self.in_wfd_activity_flag,
            Field::ManagedBy => &self.managed_by,
            Field::We12EndDate => &self.we12_end_date,
            Field::JobPlanStatus => &self.job_plan_status,
            Field::Ai12 => &self.ai12,
            Field::Js09Type => &self.js09_type,
            Field::Js10 => &self.js10,
            Field::As05 => &self.as05,
            Field::As11 => &self.as11,
            Field::As15 => &self.as15,
            Field::As16 => &self.as16,
            Field::As17 => &self.as17,
            Field::JobPlanGoal => &self.job_plan_goal,
        }
    }
}

/// One assembled statistic. A `None` count marks a section header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistic {
    pub label: &'static str,
    pub count: Option<usize>,
    pub group: Option<&'static str>,
}

fn display_count(count: &Option<usize>) -> String {
    match count {
        Some(n) => n.to_string(),
        None => String::new(),
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct StatRow {
    #[serde(rename = "Statistic")]
    #[tabled(rename = "Statistic")]
    pub label: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count", display_with = "display_count")]
    pub count: Option<usize>,
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
}

impl From<&Statistic> for StatRow {
    fn from(stat: &Statistic) -> Self {
        StatRow {
            label: stat.label.to_string(),
            count: stat.count,
            group: stat.group.unwrap_or("").to_string(),
        }
    }
}

/// Drill-down row: the three identifying columns the expanded table shows.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ClientRow {
    #[serde(rename = "JOB_SEEKER_ID")]
    #[tabled(rename = "JOB_SEEKER_ID")]
    pub job_seeker_id: i64,
    #[serde(rename = "FIRST_GIVEN_NAME")]
    #[tabled(rename = "FIRST_GIVEN_NAME")]
    pub first_given_name: String,
    #[serde(rename = "FAMILY_NAME")]
    #[tabled(rename = "FAMILY_NAME")]
    pub family_name: String,
}

impl From<&JobSeeker> for ClientRow {
    fn from(r: &JobSeeker) -> Self {
        ClientRow {
            job_seeker_id: r.job_seeker_id,
            first_given_name: r.first_given_name.clone(),
            family_name: r.family_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SiteSummary {
    pub site: String,
    pub records: usize,
    pub caseload: usize,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_records: usize,
    pub commenced: usize,
    pub pending: usize,
    pub suspended: usize,
    pub total_caseload: usize,
    pub by_site: Vec<SiteSummary>,
}
