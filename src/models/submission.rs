//! 学生过渡规划表单记录
//!
//! 每个表单项对应一个字段，提交后只以 `&Submission` 传递，不再修改。

use crate::error::FormError;
use crate::models::choices::{
    AttendanceConcern, CleanlinessPreference, HelpArea, NoisePreference, WorkEnvironment,
    WorkPosition, WorkWith,
};
use chrono::NaiveDate;
use serde::Deserialize;

/// 本地需求评估分数（滑块 0-20）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "i64")]
pub struct NeedsScore(u8);

impl NeedsScore {
    pub const MAX: u8 = 20;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for NeedsScore {
    type Error = FormError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(NeedsScore(value as u8))
        } else {
            Err(FormError::NeedsScoreOutOfRange {
                value,
                max: Self::MAX,
            })
        }
    }
}

/// 一次提交的完整表单
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Submission {
    // --- General Information ---
    pub student_name: String,
    pub student_email: String,
    pub teacher_email: String,
    pub school: String,
    pub grade: String,
    pub student_id: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date_completed: NaiveDate,
    pub future_plans: String,
    pub absences: String,
    pub attendance_concern: AttendanceConcern,

    // --- Graduation Progress & Exit Warnings ---
    pub missing_credits: String,
    pub state_test: String,
    pub exit_credential: String,
    pub irc_points: String,
    pub test_eoc_scores: String,
    pub met_test_requirement: String,

    // --- Work Preferences ---
    pub work_with: Vec<WorkWith>,
    pub work_position: Vec<WorkPosition>,
    pub work_environment: Vec<WorkEnvironment>,
    pub noise_pref: Vec<NoisePreference>,
    pub clean_pref: Vec<CleanlinessPreference>,

    // --- Career Interests ---
    pub career_interests: String,

    // --- PINS Needs ---
    pub needs_score: NeedsScore,
    pub needs: String,
    pub strengths: String,

    // --- Teacher Input ---
    pub teacher_interests: String,
    pub teacher_needs: String,

    // --- Family Input ---
    pub best_contact: String,
    pub family_concerns: String,
    pub agency_requests: String,
    pub iep_questions: String,
    pub family_goals: String,
    pub form_completed_by: String,

    // --- Non-School Agencies ---
    pub ood_name: String,
    pub ood_email: String,
    pub ood_phone: String,
    pub dds_name: String,
    pub dds_email: String,
    pub dds_phone: String,

    // --- Areas Where Family Requests Help ---
    pub help_transport: bool,
    pub help_health: bool,
    pub help_self_advocacy: bool,
    pub help_training: bool,
    pub job_help: String,
}

impl Submission {
    /// 空白表单（所有文本为空，单选取默认项）
    pub fn blank(date_completed: NaiveDate) -> Self {
        Self {
            student_name: String::new(),
            student_email: String::new(),
            teacher_email: String::new(),
            school: String::new(),
            grade: String::new(),
            student_id: String::new(),
            date_completed,
            future_plans: String::new(),
            absences: String::new(),
            attendance_concern: AttendanceConcern::default(),
            missing_credits: String::new(),
            state_test: String::new(),
            exit_credential: String::new(),
            irc_points: String::new(),
            test_eoc_scores: String::new(),
            met_test_requirement: String::new(),
            work_with: Vec::new(),
            work_position: Vec::new(),
            work_environment: Vec::new(),
            noise_pref: Vec::new(),
            clean_pref: Vec::new(),
            career_interests: String::new(),
            needs_score: NeedsScore::default(),
            needs: String::new(),
            strengths: String::new(),
            teacher_interests: String::new(),
            teacher_needs: String::new(),
            best_contact: String::new(),
            family_concerns: String::new(),
            agency_requests: String::new(),
            iep_questions: String::new(),
            family_goals: String::new(),
            form_completed_by: String::new(),
            ood_name: String::new(),
            ood_email: String::new(),
            ood_phone: String::new(),
            dds_name: String::new(),
            dds_email: String::new(),
            dds_phone: String::new(),
            help_transport: false,
            help_health: false,
            help_self_advocacy: false,
            help_training: false,
            job_help: String::new(),
        }
    }

    /// 四个求助复选框，按表单顺序；未勾选的位置为空字符串
    pub fn help_area_cells(&self) -> [&'static str; 4] {
        let flag = |checked: bool, area: HelpArea| if checked { area.label() } else { "" };
        [
            flag(self.help_transport, HelpArea::Transportation),
            flag(self.help_health, HelpArea::Health),
            flag(self.help_self_advocacy, HelpArea::SelfAdvocacy),
            flag(self.help_training, HelpArea::Training),
        ]
    }

    /// 已勾选的求助领域
    pub fn help_areas(&self) -> Vec<HelpArea> {
        [
            (self.help_transport, HelpArea::Transportation),
            (self.help_health, HelpArea::Health),
            (self.help_self_advocacy, HelpArea::SelfAdvocacy),
            (self.help_training, HelpArea::Training),
        ]
        .into_iter()
        .filter_map(|(checked, area)| checked.then_some(area))
        .collect()
    }

    /// 日期统一格式化为 YYYY-MM-DD
    pub fn date_completed_text(&self) -> String {
        self.date_completed.format("%Y-%m-%d").to_string()
    }
}

impl Default for Submission {
    /// 日期默认取今天，与表单日期控件一致
    fn default() -> Self {
        Self::blank(chrono::Local::now().date_naive())
    }
}

// 日期既可以写成字符串，也可以写成 TOML 原生日期
fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, MapAccess, Visitor};
    use std::fmt;

    struct DateVisitor;

    impl<'de> Visitor<'de> for DateVisitor {
        type Value = NaiveDate;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a YYYY-MM-DD date string or a TOML date")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            parse_date(value).map_err(E::custom)
        }

        // toml 会把原生日期包装成单键 map 交给 deserialize_any
        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let (_, value): (String, String) = map
                .next_entry()?
                .ok_or_else(|| A::Error::custom("empty date value"))?;
            parse_date(&value).map_err(A::Error::custom)
        }
    }

    deserializer.deserialize_any(DateVisitor)
}

fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    // 带时间的写法只取日期部分
    let date_part = value.trim().get(..10).unwrap_or(value.trim());
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| FormError::InvalidDate {
        value: value.to_string(),
    })
}
