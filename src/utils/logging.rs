use anyhow::Result;
/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;

use crate::config::Config;

/// 初始化日志文件（覆盖旧内容，写入表头）
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n表单处理日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 向日志文件追加一行
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%H:%M:%S"),
        line
    )?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 学生过渡规划表单处理");
    info!("📋 表单版式: {}", config.layout);
    if config.dry_run {
        info!("🧪 试运行模式：只写入内存，不连接表格");
    } else {
        info!("📊 目标表格: {}", config.sheet_name);
    }
    info!("{}", "=".repeat(60));
}

/// 记录表单加载信息
pub fn log_submissions_loaded(total: usize) {
    info!("✓ 找到 {} 份待处理的表单", total);
    info!("💡 表单按文件名顺序逐份处理\n");
}

/// 打印最终统计信息
pub fn print_final_stats(success: usize, failed: usize, total: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("uplift people", 6), "uplift...");
        assert_eq!(truncate_text("日本語テキスト", 3), "日本語...");
    }

    #[test]
    fn test_log_file_header_then_lines() {
        let path = std::env::temp_dir().join(format!("transition_log_{}.txt", std::process::id()));
        let path = path.to_string_lossy().into_owned();

        init_log_file(&path).unwrap();
        append_log_line(&path, "Jane Doe -> Ashland").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(&"=".repeat(60)));
        assert!(content.contains("表单处理日志"));
        assert!(content.trim_end().ends_with("Jane Doe -> Ashland"));

        let _ = fs::remove_file(&path);
    }
}
