use include_dir::{include_dir, Dir};
use rand::Rng;
use serde::Deserialize;
use std::error::Error;

static CORPUS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/corpus");

/// Fixed set of practice sentences
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Corpus {
    pub name: String,
    pub sentences: Vec<String>,
}

impl Corpus {
    pub fn load(name: &str) -> Result<Self, Box<dyn Error>> {
        let file_name = format!("{name}.json");
        let file = CORPUS_DIR
            .get_file(&file_name)
            .ok_or_else(|| {
                format!(
                    "unknown corpus '{name}' (available: {})",
                    Self::available().join(", ")
                )
            })?;
        let text = file
            .contents_utf8()
            .ok_or_else(|| format!("corpus '{name}' is not valid utf-8"))?;
        let corpus: Corpus = serde_json::from_str(text)?;
        if corpus.sentences.is_empty() {
            return Err(format!("corpus '{name}' has no sentences").into());
        }
        Ok(corpus)
    }

    pub fn from_sentences(sentences: Vec<String>) -> Self {
        Self {
            name: "custom".to_string(),
            sentences,
        }
    }

    /// Uniform pick; an empty corpus yields an empty target
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        if self.sentences.is_empty() {
            return "";
        }
        &self.sentences[rng.gen_range(0..self.sentences.len())]
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Names of the bundled corpora
    pub fn available() -> Vec<String> {
        CORPUS_DIR
            .files()
            .filter_map(|f| {
                let path = f.path();
                match path.extension().and_then(|e| e.to_str()) {
                    Some("json") => path.file_stem().and_then(|s| s.to_str()).map(String::from),
                    _ => None,
                }
            })
            .collect()
    }
}
