//! 摘要文档渲染服务 - 业务能力层
//!
//! 只负责"把一份表单画成 PDF"，排版状态由每次渲染新建的 RenderContext 持有

use crate::error::AppResult;
use crate::infrastructure::{Align, FontFace, RenderContext};
use crate::models::choices::join_choices;
use crate::models::row::counselor_text;
use crate::models::section::{HighlightRule, Rgb, Section, StyledLine};
use crate::models::submission::Submission;
use tracing::debug;

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;
const TITLE_HEIGHT: f32 = 12.0;
const TITLE_GAP: f32 = 10.0;
const BAND_WIDTH: f32 = 200.0;
const LINE_HEIGHT: f32 = 8.0;
const SECTION_GAP: f32 = 2.0;

/// 已绘制的一节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    pub title: String,
    pub lines: Vec<StyledLine>,
}

/// 渲染结果
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub sections: Vec<RenderedSection>,
}

impl RenderedDocument {
    pub const MIME_TYPE: &'static str = "application/pdf";

    /// 按标题查找一节
    pub fn section(&self, title: &str) -> Option<&RenderedSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// 所有已绘制的行，按绘制顺序
    pub fn lines(&self) -> impl Iterator<Item = &StyledLine> {
        self.sections.iter().flat_map(|s| s.lines.iter())
    }
}

/// 文档渲染能力
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, submission: &Submission) -> AppResult<RenderedDocument>;
}

/// 按县分表版式的摘要：逐行高亮，文件名取学生姓名和日期
#[derive(Debug, Clone, Copy, Default)]
pub struct CountySummaryRenderer;

impl CountySummaryRenderer {
    pub const TITLE: &'static str = "Student Transition Planning Summary";

    /// `<姓名>_<日期>.pdf`，空格替换为下划线
    pub fn filename(submission: &Submission) -> String {
        format!(
            "{}_{}.pdf",
            submission.student_name,
            submission.date_completed_text()
        )
        .replace(' ', "_")
    }

    pub fn sections(submission: &Submission) -> Vec<Section> {
        let s = submission;
        const DARK_BLUE: Rgb = Rgb(0, 0, 139);
        const DARK_GREEN: Rgb = Rgb(0, 100, 0);
        const FIREBRICK: Rgb = Rgb(178, 34, 34);

        vec![
            section(GENERAL, Rgb(173, 216, 230), general_lines(s))
                .rule(HighlightRule::bold("Student Name", DARK_BLUE))
                .rule(HighlightRule::bold("Student Email", DARK_BLUE)),
            section(GRADUATION, Rgb(255, 255, 153), graduation_lines(s))
                .rule(HighlightRule::bold("In Progress", Rgb(255, 0, 0))),
            section(WORK, Rgb(144, 238, 144), work_lines(s))
                .rule(HighlightRule::bold("Work With: Others", DARK_GREEN))
                .rule(HighlightRule::bold("Work Environment: Inside", DARK_GREEN)),
            section(CAREER, Rgb(216, 191, 216), vec![s.career_interests.clone()])
                .rule(HighlightRule::italic("uplift people and empower", Rgb(128, 0, 128))),
            section(PINS, Rgb(255, 228, 181), pins_lines(s)).rule(HighlightRule::bold(
                format!("Needs Score: {}", s.needs_score.value()),
                Rgb(255, 140, 0),
            )),
            section(TEACHER, Rgb(211, 211, 211), teacher_lines(s)).rule(HighlightRule::italic(
                "long walks on the beach and getting ice cream",
                Rgb(105, 105, 105),
            )),
            section(FAMILY, Rgb(255, 182, 193), family_lines(s))
                .rule(HighlightRule::bold("Family Goals", Rgb(255, 20, 147))),
            section(AGENCIES, Rgb(175, 238, 238), agency_lines(s))
                .rule(HighlightRule::bold("Counselor", Rgb(0, 128, 128))),
            section(HELP, Rgb(255, 204, 203), help_lines(s))
                .rule(HighlightRule::bold("Transportation", FIREBRICK))
                .rule(HighlightRule::bold("Self-advocacy", FIREBRICK)),
        ]
    }
}

impl DocumentRenderer for CountySummaryRenderer {
    fn render(&self, submission: &Submission) -> AppResult<RenderedDocument> {
        compose(
            Self::TITLE,
            Self::filename(submission),
            &Self::sections(submission),
        )
    }
}

/// 单表版式的摘要：整节高亮，固定文件名
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactSummaryRenderer;

impl CompactSummaryRenderer {
    pub const TITLE: &'static str = "Student Transition Summary";
    pub const FILENAME: &'static str = "transition_summary.pdf";

    pub fn sections(submission: &Submission) -> Vec<Section> {
        let s = submission;
        vec![
            section(GENERAL, Rgb(173, 216, 230), general_lines(s)),
            section(GRADUATION, Rgb(255, 255, 153), graduation_lines(s))
                .rule(HighlightRule::bold("In Progress", Rgb(255, 0, 0))),
            section(WORK, Rgb(144, 238, 144), work_lines(s)),
            section(CAREER, Rgb(216, 191, 216), vec![s.career_interests.clone()]),
            section(PINS, Rgb(255, 228, 181), pins_lines(s)),
            section(TEACHER, Rgb(211, 211, 211), teacher_lines(s)),
            section(FAMILY, Rgb(255, 182, 193), family_lines(s)),
            section(AGENCIES, Rgb(175, 238, 238), agency_lines(s)),
            section(HELP, Rgb(255, 204, 203), help_lines(s)),
        ]
        .into_iter()
        .map(Section::block_scoped)
        .collect()
    }
}

impl DocumentRenderer for CompactSummaryRenderer {
    fn render(&self, submission: &Submission) -> AppResult<RenderedDocument> {
        compose(
            Self::TITLE,
            Self::FILENAME.to_string(),
            &Self::sections(submission),
        )
    }
}

// ========== 各节标题与行内容 ==========

pub const GENERAL: &str = "General Information";
pub const GRADUATION: &str = "Graduation Progress & Exit Warnings";
pub const WORK: &str = "Work Preferences";
pub const CAREER: &str = "Career Interests";
pub const PINS: &str = "PINS Needs";
pub const TEACHER: &str = "Teacher Input";
pub const FAMILY: &str = "Family Input";
pub const AGENCIES: &str = "Non-School Agencies";
pub const HELP: &str = "Areas Where Family Requests Help";

fn section(title: &str, background: Rgb, lines: Vec<String>) -> Section {
    let mut section = Section::new(title, background);
    section.lines = lines;
    section
}

fn general_lines(s: &Submission) -> Vec<String> {
    vec![
        format!("Student Name: {}", s.student_name),
        format!("Student Email: {}", s.student_email),
        format!("Teacher Email: {}", s.teacher_email),
        format!("School: {}", s.school),
        format!("Grade: {}", s.grade),
        format!("Student ID: {}", s.student_id),
        format!("Date Completed: {}", s.date_completed_text()),
        format!("Future Plans: {}", s.future_plans),
        format!("Absences: {}", s.absences),
        format!("Attendance Concern: {}", s.attendance_concern),
    ]
}

fn graduation_lines(s: &Submission) -> Vec<String> {
    vec![
        format!("Missing Credits: {}", s.missing_credits),
        format!("State Test: {}", s.state_test),
        format!("Exit Credential: {}", s.exit_credential),
        format!("IRC Points: {}", s.irc_points),
        format!("Test EOC Scores: {}", s.test_eoc_scores),
        format!("Met Test Requirement: {}", s.met_test_requirement),
    ]
}

fn work_lines(s: &Submission) -> Vec<String> {
    vec![
        format!("Work With: {}", join_choices(&s.work_with)),
        format!("Work Position: {}", join_choices(&s.work_position)),
        format!("Work Environment: {}", join_choices(&s.work_environment)),
        format!("Noise Preference: {}", join_choices(&s.noise_pref)),
        format!("Cleanliness Preference: {}", join_choices(&s.clean_pref)),
    ]
}

fn pins_lines(s: &Submission) -> Vec<String> {
    vec![
        format!("Needs Score: {}", s.needs_score.value()),
        format!("Needs: {}", s.needs),
        format!("Strengths: {}", s.strengths),
    ]
}

fn teacher_lines(s: &Submission) -> Vec<String> {
    vec![
        format!("Interests: {}", s.teacher_interests),
        format!("Needs: {}", s.teacher_needs),
    ]
}

fn family_lines(s: &Submission) -> Vec<String> {
    vec![
        format!("Best Contact: {}", s.best_contact),
        format!("Family Concerns: {}", s.family_concerns),
        format!("Agency Requests: {}", s.agency_requests),
        format!("IEP Questions: {}", s.iep_questions),
        format!("Family Goals: {}", s.family_goals),
        format!("Form Completed By: {}", s.form_completed_by),
    ]
}

fn agency_lines(s: &Submission) -> Vec<String> {
    vec![
        format!("OOD Counselor: {}", counselor_text(&s.ood_name, &s.ood_email, &s.ood_phone)),
        format!("DDS Counselor: {}", counselor_text(&s.dds_name, &s.dds_email, &s.dds_phone)),
    ]
}

fn help_lines(s: &Submission) -> Vec<String> {
    let mut lines: Vec<String> = s.help_area_cells().iter().map(|c| c.to_string()).collect();
    lines.push(format!("Job Help: {}", s.job_help));
    lines
}

// ========== 排版 ==========

/// 标题 + 各节，依次排版
fn compose(title: &str, filename: String, sections: &[Section]) -> AppResult<RenderedDocument> {
    let mut ctx = RenderContext::new();

    ctx.set_font(FontFace::Bold, TITLE_SIZE);
    ctx.cell(BAND_WIDTH, TITLE_HEIGHT, title, Align::Center, false);
    ctx.ln(TITLE_GAP);

    let rendered: Vec<RenderedSection> = sections
        .iter()
        .map(|section| draw_section(&mut ctx, section))
        .collect();

    let page_count = ctx.page_count();
    let bytes = ctx.finish()?;
    debug!("已生成 {}: {} 页, {} 字节", filename, page_count, bytes.len());

    Ok(RenderedDocument {
        filename,
        bytes,
        page_count,
        sections: rendered,
    })
}

/// 底色标题条 + 每个非空行一条 "- " 开头的项目，每行结束后恢复默认字体和颜色
fn draw_section(ctx: &mut RenderContext, section: &Section) -> RenderedSection {
    ctx.set_fill_color(section.background);
    ctx.set_font(FontFace::Bold, BODY_SIZE);
    ctx.cell(BAND_WIDTH, LINE_HEIGHT, &section.title, Align::Left, true);

    let lines = section.styled_lines();
    for line in &lines {
        ctx.set_text_color(line.color);
        ctx.set_font(line.emphasis.into(), BODY_SIZE);
        ctx.multi_cell(LINE_HEIGHT, &format!("- {}", line.text));
        ctx.set_font(FontFace::Regular, BODY_SIZE);
        ctx.set_text_color(Rgb::BLACK);
    }
    ctx.ln(SECTION_GAP);

    RenderedSection {
        title: section.title.clone(),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::choices::{WorkEnvironment, WorkWith};
    use crate::models::section::Emphasis;
    use crate::models::submission::NeedsScore;
    use chrono::NaiveDate;

    fn jane_doe() -> Submission {
        let mut s = Submission::blank(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        s.student_name = "Jane Doe".into();
        s.school = "Ashland East".into();
        s.work_with = vec![WorkWith::Others];
        s.help_transport = true;
        s.help_health = false;
        s
    }

    fn line<'a>(doc: &'a RenderedDocument, text: &str) -> &'a StyledLine {
        doc.lines()
            .find(|l| l.text == text)
            .unwrap_or_else(|| panic!("没有找到行: {}", text))
    }

    #[test]
    fn test_jane_doe_scenario() {
        let doc = CountySummaryRenderer.render(&jane_doe()).unwrap();

        assert_eq!(doc.filename, "Jane_Doe_2024-05-01.pdf");
        assert!(doc.bytes.starts_with(b"%PDF"));

        let transport = line(&doc, "Transportation");
        assert_eq!(transport.emphasis, Emphasis::Bold);
        assert_eq!(transport.color, Rgb(178, 34, 34));

        assert!(doc.lines().all(|l| !l.text.contains("Health")));
        assert_eq!(line(&doc, "Work With: Others").color, Rgb(0, 100, 0));
        assert_eq!(line(&doc, "Student Name: Jane Doe").color, Rgb(0, 0, 139));
    }

    #[test]
    fn test_in_progress_eoc_is_red_bold() {
        let mut s = jane_doe();
        s.test_eoc_scores = "In Progress".into();
        s.state_test = "Passed".into();

        let doc = CountySummaryRenderer.render(&s).unwrap();
        let eoc = line(&doc, "Test EOC Scores: In Progress");
        assert_eq!(eoc.emphasis, Emphasis::Bold);
        assert_eq!(eoc.color, Rgb(255, 0, 0));
        assert_eq!(line(&doc, "State Test: Passed").emphasis, Emphasis::Regular);
    }

    #[test]
    fn test_compact_highlights_whole_graduation_block() {
        let mut s = jane_doe();
        s.test_eoc_scores = "in progress".into();

        let doc = CompactSummaryRenderer.render(&s).unwrap();
        assert_eq!(doc.filename, CompactSummaryRenderer::FILENAME);

        let graduation = doc.section(GRADUATION).unwrap();
        assert_eq!(graduation.lines.len(), 6);
        assert!(graduation.lines.iter().all(|l| l.color == Rgb(255, 0, 0)));

        let general = doc.section(GENERAL).unwrap();
        assert!(general.lines.iter().all(|l| l.emphasis == Emphasis::Regular));
    }

    #[test]
    fn test_empty_sources_are_dropped() {
        let doc = CountySummaryRenderer.render(&jane_doe()).unwrap();

        // 未填写职业兴趣：整节只剩标题
        assert!(doc.section(CAREER).unwrap().lines.is_empty());
        let help: Vec<_> = doc
            .section(HELP)
            .unwrap()
            .lines
            .iter()
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(help, vec!["Transportation", "Job Help: "]);
    }

    #[test]
    fn test_label_text_can_trigger_rules() {
        let doc = CountySummaryRenderer.render(&jane_doe()).unwrap();

        // 家庭目标为空，标签本身仍然命中
        assert_eq!(line(&doc, "Family Goals: ").color, Rgb(255, 20, 147));
        let agencies = doc.section(AGENCIES).unwrap();
        assert!(agencies.lines.iter().all(|l| l.emphasis == Emphasis::Bold));
    }

    #[test]
    fn test_needs_score_rule_uses_submitted_score() {
        let mut s = jane_doe();
        s.needs_score = NeedsScore::try_from(7).unwrap();

        let doc = CountySummaryRenderer.render(&s).unwrap();
        assert_eq!(line(&doc, "Needs Score: 7").color, Rgb(255, 140, 0));
        assert_eq!(line(&doc, "Needs: ").emphasis, Emphasis::Regular);
    }

    #[test]
    fn test_first_rule_wins_on_work_preferences() {
        let mut s = jane_doe();
        s.work_environment = vec![WorkEnvironment::Inside];

        let sections = CountySummaryRenderer::sections(&s);
        let work = sections.iter().find(|sec| sec.title == WORK).unwrap();
        assert_eq!(work.rules[0].pattern, "Work With: Others");
        let doc = CountySummaryRenderer.render(&s).unwrap();
        assert_eq!(line(&doc, "Work Environment: Inside").emphasis, Emphasis::Bold);
    }

    #[test]
    fn test_long_answers_flow_onto_more_pages() {
        let mut s = jane_doe();
        s.needs = "Needs extra time on assessments and a quiet place to work. ".repeat(60);

        let doc = CountySummaryRenderer.render(&s).unwrap();
        assert!(doc.page_count >= 2);

        let parsed = lopdf::Document::load_mem(&doc.bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), doc.page_count);
    }
}
