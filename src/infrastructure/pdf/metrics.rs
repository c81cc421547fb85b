//! Helvetica 字宽表与 WinAnsi 编码
//!
//! 宽度单位为 1/1000 em，取自标准 Helvetica AFM。

use crate::models::section::Emphasis;

/// 毫米与点的换算系数
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// 标准 14 字体中使用的三种字形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
    Oblique,
}

impl FontFace {
    /// 页面资源中的字体名
    pub fn resource_name(self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
            FontFace::Oblique => "F3",
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
            FontFace::Oblique => "Helvetica-Oblique",
        }
    }

    pub const ALL: [FontFace; 3] = [FontFace::Regular, FontFace::Bold, FontFace::Oblique];
}

impl From<Emphasis> for FontFace {
    fn from(emphasis: Emphasis) -> Self {
        match emphasis {
            Emphasis::Regular => FontFace::Regular,
            Emphasis::Bold => FontFace::Bold,
            Emphasis::Italic => FontFace::Oblique,
        }
    }
}

// 0x20..=0x7E
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// 单个 WinAnsi 字节的宽度
pub fn glyph_width(face: FontFace, byte: u8) -> u16 {
    let table = match face {
        FontFace::Bold => &HELVETICA_BOLD,
        // Oblique 与 Regular 字宽相同
        FontFace::Regular | FontFace::Oblique => &HELVETICA,
    };

    match byte {
        0x20..=0x7E => table[usize::from(byte - 0x20)],
        0x91 | 0x92 => 222,
        0x93 | 0x94 => 333,
        0x95 => 350,
        0x96 => 556,
        0x85 | 0x97 => 1000,
        _ => 556,
    }
}

/// 已编码文本的宽度（毫米）
pub fn text_width_mm(face: FontFace, size_pt: f32, bytes: &[u8]) -> f32 {
    let units: u32 = bytes.iter().map(|&b| u32::from(glyph_width(face, b))).sum();
    units as f32 * size_pt / 1000.0 / POINTS_PER_MM
}

/// 编码为 WinAnsi；无法表示的字符替换为 '?'
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter(|c| *c != '\r')
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\t' => b' ',
            '\n' => b'\n',
            c if (' '..='~').contains(&c) => c as u8,
            c if ('\u{A0}'..='\u{FF}').contains(&c) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
