use fs_err as fs;
use serde::Serialize;
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::prompt::CompiledPrompt;

/// Where one generation's artifacts went.
#[derive(Debug, Clone)]
pub struct SavedPaths {
    pub dir: PathBuf,
    pub prompt: PathBuf,
    pub completion: PathBuf,
}

#[derive(Serialize)]
struct PromptRecord<'a> {
    tx: Uuid,
    timestamp: chrono::DateTime<chrono::Utc>,
    model: &'a str,
    #[serde(flatten)]
    prompt: &'a CompiledPrompt,
}

pub fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join(".ideagen").join("tx").join(tx.to_string())
}

/// Write the compiled prompt and the raw completion text for one generation.
pub fn save_transcript(
    root: &Path,
    tx: Uuid,
    model: &str,
    prompt: &CompiledPrompt,
    completion: &str,
) -> anyhow::Result<SavedPaths> {
    let dir = tx_dir(root, tx);
    fs::create_dir_all(&dir)?;

    let prompt_path = dir.join("prompt.json");
    let record = PromptRecord { tx, timestamp: chrono::Utc::now(), model, prompt };
    fs::write(&prompt_path, to_string_pretty(&record)?)?;

    let completion_path = dir.join("completion.txt");
    fs::write(&completion_path, completion)?;

    Ok(SavedPaths { dir, prompt: prompt_path, completion: completion_path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ExpectedShape;

    #[test]
    fn writes_prompt_and_completion() {
        let root = tempfile::tempdir().unwrap();
        let tx = Uuid::new_v4();
        let prompt = CompiledPrompt {
            system: "sys".into(),
            user: "usr".into(),
            temperature: 0.9,
            shape: ExpectedShape::Ideas,
            count: Some(5),
        };
        let saved = save_transcript(root.path(), tx, "m", &prompt, "not json").unwrap();
        assert!(saved.dir.ends_with(tx.to_string()));
        assert_eq!(std::fs::read_to_string(&saved.completion).unwrap(), "not json");
        let rec: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&saved.prompt).unwrap()).unwrap();
        assert_eq!(rec["user"], "usr");
        assert_eq!(rec["shape"], "ideas");
        assert_eq!(rec["model"], "m");
    }
}
