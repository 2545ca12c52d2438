// Phrase-table model used for each stage of the local pipeline
use crate::domain::error::TtError;
use crate::domain::traits::StepModel;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::ops::ControlFlow;
use std::path::Path;

/// Files a model directory must contain
pub const REQUIRED_FILES: [&str; 2] = ["config.json", "lexicon.tsv"];

#[derive(Deserialize, Debug)]
struct Manifest {
    source_language: String,
    target_language: String,
    #[serde(default = "default_joiner")]
    joiner: String,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
}

fn default_joiner() -> String {
    " ".to_string()
}
fn default_lowercase() -> bool {
    true
}

/// Greedy longest-match phrase translator.
///
/// Emits one output token per step so a caller can stop generation between
/// tokens.
#[derive(Debug)]
pub struct LexiconModel {
    name: String,
    joiner: String,
    lowercase: bool,
    phrases: HashMap<Vec<String>, Vec<String>>,
    max_phrase_len: usize,
}

impl LexiconModel {
    pub fn load(dir: &Path) -> Result<Self, TtError> {
        if !dir.is_dir() {
            return Err(TtError::ModelAssets(format!(
                "model directory not found: {}",
                dir.display()
            )));
        }

        let missing: Vec<&str> = REQUIRED_FILES
            .iter()
            .copied()
            .filter(|file| !dir.join(file).is_file())
            .collect();
        if !missing.is_empty() {
            return Err(TtError::ModelAssets(format!(
                "{} is missing files: {}",
                dir.display(),
                missing.join(", ")
            )));
        }

        let manifest: Manifest =
            serde_json::from_str(&fs::read_to_string(dir.join("config.json"))?)?;
        let table = fs::read_to_string(dir.join("lexicon.tsv"))?;
        Self::from_table(manifest, &table)
    }

    fn from_table(manifest: Manifest, table: &str) -> Result<Self, TtError> {
        let mut phrases = HashMap::new();
        let mut max_phrase_len = 0;

        for (lineno, line) in table.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (source, target) = line.split_once('\t').ok_or_else(|| {
                TtError::ModelAssets(format!(
                    "lexicon.tsv line {}: expected source<TAB>target",
                    lineno + 1
                ))
            })?;

            let key: Vec<String> = source
                .split_whitespace()
                .map(|t| normalize(t, manifest.lowercase))
                .collect();
            let value: Vec<String> = target.split_whitespace().map(str::to_string).collect();
            if key.is_empty() || value.is_empty() {
                continue;
            }
            max_phrase_len = max_phrase_len.max(key.len());
            phrases.insert(key, value);
        }

        if phrases.is_empty() {
            return Err(TtError::ModelAssets("lexicon.tsv has no entries".to_string()));
        }

        Ok(Self {
            name: format!("{}-{}", manifest.source_language, manifest.target_language),
            joiner: manifest.joiner,
            lowercase: manifest.lowercase,
            phrases,
            max_phrase_len,
        })
    }
}

fn normalize(token: &str, lowercase: bool) -> String {
    if lowercase {
        token.to_lowercase()
    } else {
        token.to_string()
    }
}

impl StepModel for LexiconModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(
        &self,
        text: &str,
        on_step: &mut dyn FnMut(usize) -> ControlFlow<()>,
    ) -> Result<Option<String>, TtError> {
        let original: Vec<&str> = text.split_whitespace().collect();
        let normalized: Vec<String> = original
            .iter()
            .map(|t| normalize(t, self.lowercase))
            .collect();

        let mut output: Vec<String> = Vec::new();
        let mut i = 0;
        while i < normalized.len() {
            let longest = (1..=self.max_phrase_len.min(normalized.len() - i))
                .rev()
                .find_map(|n| self.phrases.get(&normalized[i..i + n]).map(|t| (n, t)));

            let (consumed, emitted) = match longest {
                Some((n, target)) => (n, target.clone()),
                // 未登录词原样输出
                None => (1, vec![original[i].to_string()]),
            };
            i += consumed;

            for token in emitted {
                output.push(token);
                if on_step(output.len()).is_break() {
                    return Ok(None);
                }
            }
        }

        Ok(Some(output.join(&self.joiner)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(joiner: &str, table: &str) -> LexiconModel {
        let manifest = Manifest {
            source_language: "en".to_string(),
            target_language: "zh".to_string(),
            joiner: joiner.to_string(),
            lowercase: true,
        };
        LexiconModel::from_table(manifest, table).unwrap()
    }

    fn run(model: &LexiconModel, text: &str) -> String {
        model
            .generate(text, &mut |_| ControlFlow::Continue(()))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn prefers_longest_phrase() {
        let m = model("", "good\t好\nmorning\t早上\ngood morning\t早上好\n");
        assert_eq!(run(&m, "Good morning"), "早上好");
        assert_eq!(run(&m, "good"), "好");
    }

    #[test]
    fn unknown_tokens_pass_through() {
        let m = model(" ", "cat\tgato\n");
        assert_eq!(run(&m, "the Cat"), "the gato");
    }

    #[test]
    fn one_step_per_output_token() {
        let m = model(" ", "hello\tbon jour\nworld\tmonde\n");
        let mut steps = Vec::new();
        let out = m
            .generate("hello world", &mut |n| {
                steps.push(n);
                ControlFlow::Continue(())
            })
            .unwrap();
        assert_eq!(out.as_deref(), Some("bon jour monde"));
        assert_eq!(steps, vec![1, 2, 3]);
    }

    #[test]
    fn break_stops_generation() {
        let m = model(" ", "a\tx\nb\ty\nc\tz\n");
        let mut calls = 0;
        let out = m
            .generate("a b c", &mut |n| {
                calls += 1;
                if n == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(out, None);
        assert_eq!(calls, 2);
    }

    #[test]
    fn malformed_line_is_rejected() {
        let manifest = Manifest {
            source_language: "en".to_string(),
            target_language: "zh".to_string(),
            joiner: " ".to_string(),
            lowercase: true,
        };
        let err = LexiconModel::from_table(manifest, "# comment\nno tab here\n").unwrap_err();
        assert!(matches!(err, TtError::ModelAssets(msg) if msg.contains("line 2")));
    }

    #[test]
    fn missing_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        let err = LexiconModel::load(dir.path()).unwrap_err();
        assert!(matches!(err, TtError::ModelAssets(msg) if msg.contains("lexicon.tsv")));

        let err = LexiconModel::load(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, TtError::ModelAssets(msg) if msg.contains("not found")));
    }
}
