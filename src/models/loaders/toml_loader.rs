use crate::models::submission::Submission;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 收件箱中的一份待处理表单
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    /// 来源文件
    pub path: PathBuf,
    pub submission: Submission,
}

/// 从 TOML 文件加载一份表单
pub async fn load_submission(toml_file_path: &Path) -> Result<Submission> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let submission: Submission = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    Ok(submission)
}

/// 从文件夹中加载所有表单，按文件名排序
///
/// 解析失败的文件只记录警告并跳过，不影响其它表单。
pub async fn load_all_submissions(folder_path: &str) -> Result<Vec<PendingSubmission>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut pending = Vec::with_capacity(toml_files.len());
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_submission(&path).await {
            Ok(submission) => pending.push(PendingSubmission { path, submission }),
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "transition_loader_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_all_skips_broken_and_foreign_files() {
        let dir = scratch_dir("mixed");
        std::fs::write(
            dir.join("b.toml"),
            "student_name = \"Ben\"\ndate_completed = 2024-05-02\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("a.toml"),
            "student_name = \"Ann\"\ndate_completed = \"2024-05-01\"\n",
        )
        .unwrap();
        std::fs::write(dir.join("broken.toml"), "student_name = \n").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignore me").unwrap();

        let pending = load_all_submissions(dir.to_str().unwrap()).await.unwrap();

        let names: Vec<_> = pending
            .iter()
            .map(|p| p.submission.student_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ann", "Ben"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_missing_folder_is_an_error() {
        let result = load_all_submissions("/definitely/not/here/submissions").await;
        assert!(result.is_err());
    }
}
