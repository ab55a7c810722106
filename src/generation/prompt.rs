//! Prompt template and sample scripts loaded from disk.

use std::path::Path;

use crate::error::{Result, ScriptcastError};

/// Prompt template plus reference scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptAssets {
    pub prompt: String,
    pub samples: String,
}

impl PromptAssets {
    pub fn new(prompt: impl Into<String>, samples: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            samples: samples.into(),
        }
    }

    /// Read the prompt template and the samples file.
    ///
    /// The prompt is kept verbatim. Sample files keep only non-empty
    /// lines, trimmed and joined with `\n`.
    pub async fn load(prompt_path: impl AsRef<Path>, samples_path: impl AsRef<Path>) -> Result<Self> {
        let prompt = read(prompt_path.as_ref()).await?;
        let samples = read(samples_path.as_ref()).await?;
        Ok(Self {
            prompt,
            samples: normalize_samples(&samples),
        })
    }
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        ScriptcastError::Configuration(format!("Cannot read {}: {e}", path.display()))
    })
}

pub fn normalize_samples(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn samples_drop_blank_lines_and_padding() {
        assert_eq!(
            normalize_samples("  First script  \n\n\t\nSecond script\n"),
            "First script\nSecond script"
        );
    }

    #[tokio::test]
    async fn load_reads_both_files() {
        let dir = TempDir::new().unwrap();
        let prompt = dir.path().join("prompt.txt");
        let samples = dir.path().join("samples.txt");
        std::fs::write(&prompt, "Write a hook.\n").unwrap();
        std::fs::write(&samples, "\nA\n\n B \n").unwrap();

        let assets = PromptAssets::load(&prompt, &samples).await.unwrap();
        assert_eq!(assets, PromptAssets::new("Write a hook.\n", "A\nB"));
    }

    #[tokio::test]
    async fn missing_file_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        let err = PromptAssets::load(dir.path().join("nope.txt"), dir.path().join("nope2.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptcastError::Configuration(msg) if msg.contains("nope.txt")));
    }
}
