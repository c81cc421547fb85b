//! 表单中的单选 / 多选项

use serde::Deserialize;
use std::fmt;

/// 把多选项按选择顺序拼接成 "A, B"，未选择时为空字符串
pub fn join_choices<T: fmt::Display>(choices: &[T]) -> String {
    choices
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// 生成带 Display 的选项枚举（展示文本与序列化文本一致）
macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// 表单上显示的文本
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_enum!(
    /// 出勤问题（单选，默认第一项）
    AttendanceConcern { Yes => "Yes", No => "No" }
);

impl Default for AttendanceConcern {
    fn default() -> Self {
        AttendanceConcern::Yes
    }
}

choice_enum!(
    /// 工作方式
    WorkWith { Others => "Others", Alone => "Alone" }
);

choice_enum!(
    /// 工作姿势
    WorkPosition { Standing => "Standing", Sitting => "Sitting" }
);

choice_enum!(
    /// 工作环境
    WorkEnvironment { Inside => "Inside", Outside => "Outside" }
);

choice_enum!(
    /// 噪音偏好
    NoisePreference { Quiet => "Quiet", Noisy => "Noisy" }
);

choice_enum!(
    /// 清洁偏好
    CleanlinessPreference { Clean => "Clean", Dirty => "Dirty" }
);

choice_enum!(
    /// 家庭请求帮助的领域
    HelpArea {
        Transportation => "Transportation",
        Health => "Health",
        SelfAdvocacy => "Self-advocacy",
        Training => "Training",
    }
);
