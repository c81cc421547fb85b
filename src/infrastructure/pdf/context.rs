//! 流式排版上下文
//!
//! 以毫米为单位自上而下排版，空间不足以放下下一个单元格时自动换页。
//! 每份文档新建一个上下文，排版状态不在文档之间共享。

use super::metrics::{encode_win_ansi, text_width_mm, FontFace, POINTS_PER_MM};
use crate::error::{AppResult, RenderError};
use crate::models::section::Rgb;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

/// A4 纵向
pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
/// 左、上、右边距
pub const MARGIN: f32 = 10.0;
/// 自动换页的底部边距
pub const BOTTOM_MARGIN: f32 = 20.0;
/// 单元格内文字的左右留白
pub const CELL_PADDING: f32 = 1.0;

const PAGE_BREAK_TRIGGER: f32 = PAGE_HEIGHT - BOTTOM_MARGIN;

/// 单元格内文字对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// 排版上下文：当前页、光标、字体和颜色
pub struct RenderContext {
    pages: Vec<Vec<Operation>>,
    y: f32,
    face: FontFace,
    font_size: f32,
    text_color: Rgb,
    fill_color: Rgb,
}

impl RenderContext {
    /// 新文档，已打开第一页
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: MARGIN,
            face: FontFace::Regular,
            font_size: 12.0,
            text_color: Rgb::BLACK,
            fill_color: Rgb(255, 255, 255),
        }
    }

    pub fn set_font(&mut self, face: FontFace, size_pt: f32) {
        self.face = face;
        self.font_size = size_pt;
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn set_fill_color(&mut self, color: Rgb) {
        self.fill_color = color;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 光标到页面顶端的距离（毫米）
    #[cfg(test)]
    fn cursor_y(&self) -> f32 {
        self.y
    }

    /// 可写区域宽度
    pub fn content_width(&self) -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    /// 光标下移
    pub fn ln(&mut self, height: f32) {
        self.y += height;
    }

    /// 在左边距处画一个单元格，然后光标移到下一行
    pub fn cell(&mut self, width: f32, height: f32, text: &str, align: Align, fill: bool) {
        self.ensure_room(height);

        let top = self.y;
        let x = MARGIN;

        if fill {
            let [r, g, b] = self.fill_color.components();
            self.push_ops(vec![
                Operation::new("q", vec![]),
                Operation::new("rg", vec![Object::Real(r), Object::Real(g), Object::Real(b)]),
                Operation::new(
                    "re",
                    vec![
                        pt(x),
                        pt(PAGE_HEIGHT - top),
                        pt(width),
                        pt(-height),
                    ],
                ),
                Operation::new("f", vec![]),
                Operation::new("Q", vec![]),
            ]);
        }

        let encoded = encode_win_ansi(text);
        if !encoded.is_empty() {
            let text_width = text_width_mm(self.face, self.font_size, &encoded);
            let dx = match align {
                Align::Left => CELL_PADDING,
                Align::Center => (width - text_width) / 2.0,
            };
            let baseline = top + 0.5 * height + 0.3 * self.font_size / POINTS_PER_MM;
            self.push_text(x + dx, baseline, encoded);
        }

        self.y = top + height;
    }

    /// 占满可写宽度的多行单元格，按词换行；超长单词按字符截断
    pub fn multi_cell(&mut self, line_height: f32, text: &str) {
        let max_text_width = self.content_width() - 2.0 * CELL_PADDING;
        let encoded = encode_win_ansi(text);

        for line in wrap_lines(&encoded, self.face, self.font_size, max_text_width) {
            self.text_row(line_height, line);
        }
    }

    /// 序列化为 PDF
    pub fn finish(self) -> AppResult<Vec<u8>> {
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for face in FontFace::ALL {
            let mut font = Dictionary::new();
            font.set("Type", Object::Name(b"Font".to_vec()));
            font.set("Subtype", Object::Name(b"Type1".to_vec()));
            font.set("BaseFont", Object::Name(face.base_font().as_bytes().to_vec()));
            font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
            let font_id = doc.add_object(Object::Dictionary(font));
            fonts.set(face.resource_name(), Object::Reference(font_id));
        }
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        let resources_id = doc.add_object(Object::Dictionary(resources));

        let mut page_ids = Vec::with_capacity(self.pages.len());
        for (index, operations) in self.pages.into_iter().enumerate() {
            let content = Content { operations };
            let data = content
                .encode()
                .map_err(|e| RenderError::ContentEncodeFailed {
                    page: index + 1,
                    reason: e.to_string(),
                })?;
            let content_id = doc.add_object(Stream::new(Dictionary::new(), data));

            let page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                ("Contents", Object::Reference(content_id)),
            ]);
            page_ids.push(doc.add_object(page));
        }

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(page_ids.len() as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
            ("Resources", Object::Reference(resources_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    pt(PAGE_WIDTH),
                    pt(PAGE_HEIGHT),
                ]),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| RenderError::SaveFailed(e.to_string()))?;

        Ok(buffer)
    }

    /// 左对齐、无底色的一行
    fn text_row(&mut self, height: f32, encoded: Vec<u8>) {
        self.ensure_room(height);
        if !encoded.is_empty() {
            let baseline = self.y + 0.5 * height + 0.3 * self.font_size / POINTS_PER_MM;
            self.push_text(MARGIN + CELL_PADDING, baseline, encoded);
        }
        self.y += height;
    }

    /// 剩余高度不够时换页
    fn ensure_room(&mut self, height: f32) {
        if self.y + height > PAGE_BREAK_TRIGGER {
            self.pages.push(Vec::new());
            self.y = MARGIN;
        }
    }

    fn push_text(&mut self, x: f32, baseline: f32, encoded: Vec<u8>) {
        let [r, g, b] = self.text_color.components();
        let font = self.face.resource_name().as_bytes().to_vec();
        self.push_ops(vec![
            Operation::new("q", vec![]),
            Operation::new("rg", vec![Object::Real(r), Object::Real(g), Object::Real(b)]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(font), Object::Real(self.font_size)]),
            Operation::new("Td", vec![pt(x), pt(PAGE_HEIGHT - baseline)]),
            Operation::new("Tj", vec![Object::String(encoded, StringFormat::Literal)]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn push_ops(&mut self, ops: Vec<Operation>) {
        if let Some(page) = self.pages.last_mut() {
            page.extend(ops);
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 毫米转为 PDF 点
fn pt(mm: f32) -> Object {
    Object::Real(mm * POINTS_PER_MM)
}

/// 按宽度拆行：先按换行符分段，再按空格贪心填充
pub fn wrap_lines(encoded: &[u8], face: FontFace, size_pt: f32, max_width: f32) -> Vec<Vec<u8>> {
    let fits = |bytes: &[u8]| text_width_mm(face, size_pt, bytes) <= max_width;
    let mut lines = Vec::new();

    for paragraph in encoded.split(|b| *b == b'\n') {
        let mut current: Vec<u8> = Vec::new();

        for word in paragraph.split(|b| *b == b' ') {
            let mut candidate = current.clone();
            if !candidate.is_empty() {
                candidate.push(b' ');
            }
            candidate.extend_from_slice(word);

            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            // 单词本身放不下时按字符截断
            for &byte in word {
                current.push(byte);
                if !fits(&current) && current.len() > 1 {
                    current.pop();
                    lines.push(std::mem::replace(&mut current, vec![byte]));
                }
            }
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_strings(lines: Vec<Vec<u8>>) -> Vec<String> {
        lines
            .into_iter()
            .map(|l| String::from_utf8(l).unwrap())
            .collect()
    }

    #[test]
    fn test_short_text_is_one_line() {
        let lines = wrap_lines(b"- Grade: 11", FontFace::Regular, 12.0, 188.0);
        assert_eq!(as_strings(lines), vec!["- Grade: 11"]);
    }

    #[test]
    fn test_wraps_on_spaces_within_width() {
        let text = "word ".repeat(80);
        let lines = wrap_lines(text.trim_end().as_bytes(), FontFace::Regular, 12.0, 188.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(FontFace::Regular, 12.0, line) <= 188.0);
            assert!(!line.starts_with(b" "));
        }
        let rejoined = as_strings(lines).join(" ");
        assert_eq!(rejoined, text.trim_end());
    }

    #[test]
    fn test_long_word_is_broken() {
        let word = "x".repeat(200);
        let lines = wrap_lines(word.as_bytes(), FontFace::Regular, 12.0, 50.0);

        assert!(lines.len() > 1);
        assert_eq!(lines.iter().map(Vec::len).sum::<usize>(), 200);
    }

    #[test]
    fn test_newlines_start_new_lines() {
        let lines = wrap_lines(b"- Needs: a\nb\n\nc", FontFace::Regular, 12.0, 188.0);
        assert_eq!(as_strings(lines), vec!["- Needs: a", "b", "", "c"]);
    }

    #[test]
    fn test_page_break_when_height_runs_out() {
        let mut ctx = RenderContext::new();
        // (277 - 10) / 8 = 33 行放得下，第 34 行换页
        for _ in 0..33 {
            ctx.multi_cell(8.0, "- line");
        }
        assert_eq!(ctx.page_count(), 1);

        ctx.multi_cell(8.0, "- line");
        assert_eq!(ctx.page_count(), 2);
        assert_eq!(ctx.cursor_y(), MARGIN + 8.0);
    }

    #[test]
    fn test_finish_produces_loadable_pdf() {
        let mut ctx = RenderContext::new();
        ctx.set_font(FontFace::Bold, 16.0);
        ctx.cell(200.0, 12.0, "Title (draft)", Align::Center, false);
        ctx.set_fill_color(Rgb(173, 216, 230));
        ctx.cell(200.0, 8.0, "Header", Align::Left, true);
        // 第一页 30 行，第二页 33 行，剩余 7 行在第三页
        for _ in 0..70 {
            ctx.multi_cell(8.0, "- body");
        }
        let pages = ctx.page_count();

        let bytes = ctx.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), pages);
        assert_eq!(pages, 3);
    }
}
