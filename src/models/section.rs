//! 文档分节与高亮规则

/// RGB 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// PDF 颜色分量（0.0 - 1.0）
    pub fn components(self) -> [f32; 3] {
        [self.0, self.1, self.2].map(|c| f32::from(c) / 255.0)
    }
}

/// 字形强调
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Emphasis {
    #[default]
    Regular,
    Bold,
    Italic,
}

/// 高亮规则：行文本包含 pattern（不区分大小写）即命中
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRule {
    pub pattern: String,
    pub emphasis: Emphasis,
    pub color: Rgb,
}

impl HighlightRule {
    pub fn new(pattern: impl Into<String>, emphasis: Emphasis, color: Rgb) -> Self {
        Self {
            pattern: pattern.into(),
            emphasis,
            color,
        }
    }

    pub fn bold(pattern: impl Into<String>, color: Rgb) -> Self {
        Self::new(pattern, Emphasis::Bold, color)
    }

    pub fn italic(pattern: impl Into<String>, color: Rgb) -> Self {
        Self::new(pattern, Emphasis::Italic, color)
    }

    /// 匹配的是整行（含 "Label: " 前缀），标签本身也可能命中
    pub fn matches(&self, line: &str) -> bool {
        line.to_lowercase().contains(&self.pattern.to_lowercase())
    }
}

/// 规则作用范围
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HighlightScope {
    /// 每行单独匹配
    #[default]
    Line,
    /// 任一行命中即整节使用该样式
    Block,
}

/// 已确定样式的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub text: String,
    pub emphasis: Emphasis,
    pub color: Rgb,
}

impl StyledLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: Emphasis::Regular,
            color: Rgb::BLACK,
        }
    }

    fn with_rule(text: &str, rule: Option<&HighlightRule>) -> Self {
        match rule {
            Some(rule) => Self {
                text: text.to_string(),
                emphasis: rule.emphasis,
                color: rule.color,
            },
            None => Self::plain(text),
        }
    }
}

/// 文档中带标题和底色的一节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub background: Rgb,
    pub lines: Vec<String>,
    pub rules: Vec<HighlightRule>,
    pub scope: HighlightScope,
}

impl Section {
    pub fn new(title: impl Into<String>, background: Rgb) -> Self {
        Self {
            title: title.into(),
            background,
            lines: Vec::new(),
            rules: Vec::new(),
            scope: HighlightScope::Line,
        }
    }

    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    pub fn rule(mut self, rule: HighlightRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn block_scoped(mut self) -> Self {
        self.scope = HighlightScope::Block;
        self
    }

    /// 需要绘制的行：跳过空行，按声明顺序取第一条命中的规则
    pub fn styled_lines(&self) -> Vec<StyledLine> {
        let visible: Vec<&str> = self
            .lines
            .iter()
            .map(String::as_str)
            .filter(|line| !line.is_empty())
            .collect();

        match self.scope {
            HighlightScope::Line => visible
                .into_iter()
                .map(|line| StyledLine::with_rule(line, self.first_match(line)))
                .collect(),
            HighlightScope::Block => {
                let block_rule = self
                    .rules
                    .iter()
                    .find(|rule| visible.iter().any(|line| rule.matches(line)));
                visible
                    .into_iter()
                    .map(|line| StyledLine::with_rule(line, block_rule))
                    .collect()
            }
        }
    }

    fn first_match(&self, line: &str) -> Option<&HighlightRule> {
        self.rules.iter().find(|rule| rule.matches(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb(255, 0, 0);
    const GREEN: Rgb = Rgb(0, 100, 0);

    #[test]
    fn test_first_matching_rule_wins() {
        let section = Section::new("Work Preferences", Rgb(144, 238, 144))
            .line("Work With: Others")
            .rule(HighlightRule::italic("others", RED))
            .rule(HighlightRule::bold("Work With", GREEN));

        let lines = section.styled_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].emphasis, Emphasis::Italic);
        assert_eq!(lines[0].color, RED);
    }

    #[test]
    fn test_unmatched_line_is_plain() {
        let section = Section::new("Graduation", Rgb(255, 255, 153))
            .line("Test EOC Scores: Passed")
            .rule(HighlightRule::bold("In Progress", RED));

        assert_eq!(
            section.styled_lines(),
            vec![StyledLine::plain("Test EOC Scores: Passed")]
        );
    }

    #[test]
    fn test_empty_lines_never_rendered() {
        let section = Section::new("Help", Rgb(255, 204, 203))
            .line("Transportation")
            .line("")
            .line("")
            .line("Job Help: ")
            .rule(HighlightRule::bold("", RED));

        let texts: Vec<_> = section.styled_lines().into_iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["Transportation", "Job Help: "]);
    }

    #[test]
    fn test_match_is_case_insensitive_and_sees_label() {
        let rule = HighlightRule::bold("family goals", RED);
        assert!(rule.matches("Family Goals: "));
        assert!(rule.matches("FAMILY GOALS: college"));
        assert!(!rule.matches("Family Concerns: none"));
    }

    #[test]
    fn test_block_scope_styles_whole_section() {
        let section = Section::new("Graduation", Rgb(255, 255, 153))
            .line("Missing Credits: 2")
            .line("Test EOC Scores: In Progress")
            .line("")
            .rule(HighlightRule::bold("In Progress", RED))
            .block_scoped();

        let lines = section.styled_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.color == RED && l.emphasis == Emphasis::Bold));
    }

    #[test]
    fn test_block_scope_without_match_is_plain() {
        let section = Section::new("Graduation", Rgb(255, 255, 153))
            .line("Test EOC Scores: Passed")
            .rule(HighlightRule::bold("In Progress", RED))
            .block_scoped();

        assert_eq!(section.styled_lines()[0], StyledLine::plain("Test EOC Scores: Passed"));
    }

    #[test]
    fn test_rgb_components() {
        assert_eq!(Rgb(255, 0, 51).components(), [1.0, 0.0, 0.2]);
    }
}
