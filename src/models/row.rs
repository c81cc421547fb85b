//! 表格行结构
//!
//! 两种版式各自固定列顺序，列数由数组长度在编译期保证。
//! 两者互不兼容，不要合并。

use crate::models::choices::join_choices;
use crate::models::submission::Submission;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// 单元格的值
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        CellValue::Text(value.clone())
    }
}

impl From<u8> for CellValue {
    fn from(value: u8) -> Self {
        CellValue::Integer(i64::from(value))
    }
}

pub const COUNTY_COLUMNS: usize = 45;
pub const COMPACT_COLUMNS: usize = 38;

/// 按县分表版式的表头（新建工作表不写表头，只用于核对列顺序）
#[cfg(test)]
const COUNTY_HEADERS: [&str; COUNTY_COLUMNS] = [
    "Submission Date",
    "Student Name",
    "Student Email",
    "Teacher Email",
    "School",
    "Grade",
    "Student ID",
    "Date Completed",
    "Future Plans",
    "Absences",
    "Attendance Concern",
    "Missing Credits",
    "State Test",
    "Exit Credential",
    "IRC Points",
    "Test EOC Scores",
    "Met Test Requirement",
    "Work With",
    "Work Position",
    "Work Environment",
    "Noise Preference",
    "Cleanliness Preference",
    "Career Interests",
    "Needs Score",
    "Needs",
    "Strengths",
    "Teacher Interests",
    "Teacher Needs",
    "Best Contact",
    "Family Concerns",
    "Agency Requests",
    "IEP Questions",
    "Family Goals",
    "Form Completed By",
    "OOD Name",
    "OOD Email",
    "OOD Phone",
    "DDS Name",
    "DDS Email",
    "DDS Phone",
    "Transportation",
    "Health",
    "Self-advocacy",
    "Training",
    "Job Help",
];

/// 按县分表版式的一行
pub fn county_row(
    submission: &Submission,
    submitted_on: NaiveDate,
) -> [CellValue; COUNTY_COLUMNS] {
    let s = submission;
    let [transport, health, self_advocacy, training] = s.help_area_cells();
    [
        submitted_on.format("%Y-%m-%d").to_string().into(),
        (&s.student_name).into(),
        (&s.student_email).into(),
        (&s.teacher_email).into(),
        (&s.school).into(),
        (&s.grade).into(),
        (&s.student_id).into(),
        s.date_completed_text().into(),
        (&s.future_plans).into(),
        (&s.absences).into(),
        s.attendance_concern.label().into(),
        (&s.missing_credits).into(),
        (&s.state_test).into(),
        (&s.exit_credential).into(),
        (&s.irc_points).into(),
        (&s.test_eoc_scores).into(),
        (&s.met_test_requirement).into(),
        join_choices(&s.work_with).into(),
        join_choices(&s.work_position).into(),
        join_choices(&s.work_environment).into(),
        join_choices(&s.noise_pref).into(),
        join_choices(&s.clean_pref).into(),
        (&s.career_interests).into(),
        s.needs_score.value().into(),
        (&s.needs).into(),
        (&s.strengths).into(),
        (&s.teacher_interests).into(),
        (&s.teacher_needs).into(),
        (&s.best_contact).into(),
        (&s.family_concerns).into(),
        (&s.agency_requests).into(),
        (&s.iep_questions).into(),
        (&s.family_goals).into(),
        (&s.form_completed_by).into(),
        (&s.ood_name).into(),
        (&s.ood_email).into(),
        (&s.ood_phone).into(),
        (&s.dds_name).into(),
        (&s.dds_email).into(),
        (&s.dds_phone).into(),
        transport.into(),
        health.into(),
        self_advocacy.into(),
        training.into(),
        (&s.job_help).into(),
    ]
}

/// 单表版式的表头
#[cfg(test)]
const COMPACT_HEADERS: [&str; COMPACT_COLUMNS] = [
    "Date Completed",
    "Student Name",
    "Student ID",
    "Grade",
    "School",
    "Student Email",
    "Teacher Email",
    "Future Plans",
    "Absences",
    "Attendance Concern",
    "Missing Credits",
    "State Test",
    "Exit Credential",
    "IRC Points",
    "Test EOC Scores",
    "Met Test Requirement",
    "Work With",
    "Work Position",
    "Work Environment",
    "Noise Preference",
    "Cleanliness Preference",
    "Career Interests",
    "Needs Score",
    "Needs",
    "Strengths",
    "Teacher Interests",
    "Teacher Needs",
    "Best Contact",
    "Family Concerns",
    "Agency Requests",
    "IEP Questions",
    "Family Goals",
    "Form Completed By",
    "OOD Counselor",
    "DDS Counselor",
    "Help Areas",
    "Job Help",
    "Submitted",
];

/// 单表版式的一行：辅导员信息合并为一列，求助领域合并为一列
pub fn compact_row(
    submission: &Submission,
    submitted_on: NaiveDate,
) -> [CellValue; COMPACT_COLUMNS] {
    let s = submission;
    [
        s.date_completed_text().into(),
        (&s.student_name).into(),
        (&s.student_id).into(),
        (&s.grade).into(),
        (&s.school).into(),
        (&s.student_email).into(),
        (&s.teacher_email).into(),
        (&s.future_plans).into(),
        (&s.absences).into(),
        s.attendance_concern.label().into(),
        (&s.missing_credits).into(),
        (&s.state_test).into(),
        (&s.exit_credential).into(),
        (&s.irc_points).into(),
        (&s.test_eoc_scores).into(),
        (&s.met_test_requirement).into(),
        join_choices(&s.work_with).into(),
        join_choices(&s.work_position).into(),
        join_choices(&s.work_environment).into(),
        join_choices(&s.noise_pref).into(),
        join_choices(&s.clean_pref).into(),
        (&s.career_interests).into(),
        s.needs_score.value().into(),
        (&s.needs).into(),
        (&s.strengths).into(),
        (&s.teacher_interests).into(),
        (&s.teacher_needs).into(),
        (&s.best_contact).into(),
        (&s.family_concerns).into(),
        (&s.agency_requests).into(),
        (&s.iep_questions).into(),
        (&s.family_goals).into(),
        (&s.form_completed_by).into(),
        counselor_text(&s.ood_name, &s.ood_email, &s.ood_phone).into(),
        counselor_text(&s.dds_name, &s.dds_email, &s.dds_phone).into(),
        join_choices(&s.help_areas()).into(),
        (&s.job_help).into(),
        submitted_on.format("%Y-%m-%d").to_string().into(),
    ]
}

/// "姓名 (邮箱, 电话)"，PDF 中的辅导员行也使用这个格式
pub fn counselor_text(name: &str, email: &str, phone: &str) -> String {
    format!("{} ({}, {})", name, email, phone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::choices::{
        AttendanceConcern, CleanlinessPreference, NoisePreference, WorkEnvironment, WorkPosition,
        WorkWith,
    };
    use crate::models::submission::NeedsScore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Submission {
        let mut s = Submission::blank(date(2024, 5, 1));
        s.student_name = "Jane Doe".into();
        s.school = "Ashland East".into();
        s.work_with = vec![WorkWith::Others];
        s.work_environment = vec![WorkEnvironment::Outside, WorkEnvironment::Inside];
        s.needs_score = NeedsScore::try_from(12).unwrap();
        s.ood_name = "Sam".into();
        s.ood_email = "sam@ood.gov".into();
        s.ood_phone = "555-0100".into();
        s.help_transport = true;
        s.job_help = "Resume".into();
        s
    }

    fn column(headers: &[&str], name: &str) -> usize {
        headers.iter().position(|h| *h == name).unwrap()
    }

    #[test]
    fn test_county_row_fixed_positions() {
        let row = county_row(&sample(), date(2024, 5, 3));

        assert_eq!(row[0], CellValue::from("2024-05-03"));
        assert_eq!(row[1], CellValue::from("Jane Doe"));
        assert_eq!(row[7], CellValue::from("2024-05-01"));
        assert_eq!(row[17], CellValue::from("Others"));
        assert_eq!(row[18], CellValue::from(""));
        assert_eq!(row[19], CellValue::from("Outside, Inside"));
        assert_eq!(row[23], CellValue::Integer(12));
        assert_eq!(row[40], CellValue::from("Transportation"));
        assert_eq!(row[41], CellValue::from(""));
        assert_eq!(row[44], CellValue::from("Resume"));
    }

    #[test]
    fn test_headers_line_up_with_cells() {
        let row = county_row(&sample(), date(2024, 5, 3));
        assert_eq!(
            row[column(&COUNTY_HEADERS, "School")],
            CellValue::from("Ashland East")
        );
        assert_eq!(
            row[column(&COUNTY_HEADERS, "OOD Phone")],
            CellValue::from("555-0100")
        );

        let row = compact_row(&sample(), date(2024, 5, 3));
        assert_eq!(
            row[column(&COMPACT_HEADERS, "School")],
            CellValue::from("Ashland East")
        );
        assert_eq!(
            row[column(&COMPACT_HEADERS, "OOD Counselor")],
            CellValue::from("Sam (sam@ood.gov, 555-0100)")
        );
        assert_eq!(
            row[column(&COMPACT_HEADERS, "Help Areas")],
            CellValue::from("Transportation")
        );
        assert_eq!(
            row[column(&COMPACT_HEADERS, "Submitted")],
            CellValue::from("2024-05-03")
        );
    }

    /// 每个字段都填了互不相同的值
    fn filled() -> Submission {
        let mut s = Submission::blank(date(2024, 5, 1));
        s.student_name = "Jane Doe".into();
        s.student_email = "jane@student.org".into();
        s.teacher_email = "teacher@school.org".into();
        s.school = "Ashland East".into();
        s.grade = "12".into();
        s.student_id = "S-1001".into();
        s.future_plans = "Community college".into();
        s.absences = "3".into();
        s.attendance_concern = AttendanceConcern::No;
        s.missing_credits = "Algebra II".into();
        s.state_test = "Passed".into();
        s.exit_credential = "Diploma".into();
        s.irc_points = "6".into();
        s.test_eoc_scores = "In Progress".into();
        s.met_test_requirement = "Pending".into();
        s.work_with = vec![WorkWith::Alone, WorkWith::Others];
        s.work_position = vec![WorkPosition::Sitting];
        s.work_environment = vec![WorkEnvironment::Outside, WorkEnvironment::Inside];
        s.noise_pref = vec![NoisePreference::Noisy];
        s.clean_pref = vec![CleanlinessPreference::Dirty, CleanlinessPreference::Clean];
        s.career_interests = "Veterinary tech".into();
        s.needs_score = NeedsScore::try_from(12).unwrap();
        s.needs = "Extra time".into();
        s.strengths = "Patient".into();
        s.teacher_interests = "Animals".into();
        s.teacher_needs = "Reminders".into();
        s.best_contact = "Text".into();
        s.family_concerns = "Bus route".into();
        s.agency_requests = "OOD intake".into();
        s.iep_questions = "None yet".into();
        s.family_goals = "Independent living".into();
        s.form_completed_by = "Mother".into();
        s.ood_name = "Sam".into();
        s.ood_email = "sam@ood.gov".into();
        s.ood_phone = "555-0100".into();
        s.dds_name = "Pat".into();
        s.dds_email = "pat@dds.gov".into();
        s.dds_phone = "555-0200".into();
        s.help_transport = true;
        s.help_health = true;
        s.help_self_advocacy = true;
        s.help_training = true;
        s.job_help = "Resume review".into();
        s
    }

    fn shared_cells() -> Vec<(&'static str, CellValue)> {
        vec![
            ("Student Name", "Jane Doe".into()),
            ("Student Email", "jane@student.org".into()),
            ("Teacher Email", "teacher@school.org".into()),
            ("School", "Ashland East".into()),
            ("Grade", "12".into()),
            ("Student ID", "S-1001".into()),
            ("Date Completed", "2024-05-01".into()),
            ("Future Plans", "Community college".into()),
            ("Absences", "3".into()),
            ("Attendance Concern", "No".into()),
            ("Missing Credits", "Algebra II".into()),
            ("State Test", "Passed".into()),
            ("Exit Credential", "Diploma".into()),
            ("IRC Points", "6".into()),
            ("Test EOC Scores", "In Progress".into()),
            ("Met Test Requirement", "Pending".into()),
            ("Work With", "Alone, Others".into()),
            ("Work Position", "Sitting".into()),
            ("Work Environment", "Outside, Inside".into()),
            ("Noise Preference", "Noisy".into()),
            ("Cleanliness Preference", "Dirty, Clean".into()),
            ("Career Interests", "Veterinary tech".into()),
            ("Needs Score", CellValue::Integer(12)),
            ("Needs", "Extra time".into()),
            ("Strengths", "Patient".into()),
            ("Teacher Interests", "Animals".into()),
            ("Teacher Needs", "Reminders".into()),
            ("Best Contact", "Text".into()),
            ("Family Concerns", "Bus route".into()),
            ("Agency Requests", "OOD intake".into()),
            ("IEP Questions", "None yet".into()),
            ("Family Goals", "Independent living".into()),
            ("Form Completed By", "Mother".into()),
            ("Job Help", "Resume review".into()),
        ]
    }

    fn assert_each_cell_once(
        headers: &[&str],
        row: &[CellValue],
        expected: &[(&str, CellValue)],
    ) {
        assert_eq!(expected.len(), headers.len());
        for (header, value) in expected {
            assert_eq!(&row[column(headers, header)], value, "列 {}", header);
            let hits = row.iter().filter(|cell| *cell == value).count();
            assert_eq!(hits, 1, "{} 应该恰好出现一次", value);
        }
    }

    #[test]
    fn test_county_row_places_every_field() {
        let mut expected = shared_cells();
        expected.extend([
            ("Submission Date", CellValue::from("2024-05-03")),
            ("OOD Name", CellValue::from("Sam")),
            ("OOD Email", CellValue::from("sam@ood.gov")),
            ("OOD Phone", CellValue::from("555-0100")),
            ("DDS Name", CellValue::from("Pat")),
            ("DDS Email", CellValue::from("pat@dds.gov")),
            ("DDS Phone", CellValue::from("555-0200")),
            ("Transportation", CellValue::from("Transportation")),
            ("Health", CellValue::from("Health")),
            ("Self-advocacy", CellValue::from("Self-advocacy")),
            ("Training", CellValue::from("Training")),
        ]);

        let row = county_row(&filled(), date(2024, 5, 3));
        assert_each_cell_once(&COUNTY_HEADERS, &row, &expected);
    }

    #[test]
    fn test_compact_row_places_every_field() {
        let mut expected = shared_cells();
        expected.extend([
            ("Submitted", CellValue::from("2024-05-03")),
            ("OOD Counselor", CellValue::from("Sam (sam@ood.gov, 555-0100)")),
            ("DDS Counselor", CellValue::from("Pat (pat@dds.gov, 555-0200)")),
            ("Help Areas", CellValue::from("Transportation, Health, Self-advocacy, Training")),
        ]);

        let row = compact_row(&filled(), date(2024, 5, 3));
        assert_each_cell_once(&COMPACT_HEADERS, &row, &expected);
    }

    #[test]
    fn test_cells_serialize_as_plain_json() {
        let cells = vec![CellValue::from("Jane"), CellValue::from(7u8)];
        assert_eq!(serde_json::to_string(&cells).unwrap(), r#"["Jane",7]"#);
    }
}
