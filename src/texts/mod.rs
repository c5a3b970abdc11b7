use include_dir::{include_dir, Dir};
use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;
use thiserror::Error;

use crate::session::{Difficulty, TestConfig, TestMode};

static TEXT_DIR: Dir = include_dir!("src/texts");

const SAMPLES_FILE: &str = "samples.json";

#[derive(Debug, Error)]
pub enum TextError {
    #[error("text file {0} is not embedded")]
    Missing(&'static str),
    #[error("text file {0} is not valid utf-8")]
    Encoding(&'static str),
    #[error("unable to parse text samples: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("sample collection {0} is empty")]
    Empty(&'static str),
}

/// The four prompt collections a test can draw from
#[derive(Deserialize, Clone, Debug)]
pub struct SampleSet {
    /// coherent sentences, used for words mode
    pub simple: Vec<String>,
    /// unrelated common words, used for time mode
    pub time: Vec<String>,
    pub quote: Vec<String>,
    /// numbers, symbols and punctuation
    pub hard: Vec<String>,
}

impl SampleSet {
    pub fn embedded() -> Result<Self, TextError> {
        let file = TEXT_DIR
            .get_file(SAMPLES_FILE)
            .ok_or(TextError::Missing(SAMPLES_FILE))?;
        let contents = file
            .contents_utf8()
            .ok_or(TextError::Encoding(SAMPLES_FILE))?;
        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> Result<Self, TextError> {
        let set: SampleSet = serde_json::from_str(json)?;
        for (name, samples) in [
            ("simple", &set.simple),
            ("time", &set.time),
            ("quote", &set.quote),
            ("hard", &set.hard),
        ] {
            if samples.is_empty() {
                return Err(TextError::Empty(name));
            }
        }
        Ok(set)
    }

    /// Collection a given mode and difficulty draws from
    pub fn collection(&self, mode: TestMode, difficulty: Difficulty) -> &[String] {
        match (mode, difficulty) {
            (TestMode::Time, _) => &self.time,
            (TestMode::Quote, Difficulty::Hard) => &self.hard,
            (TestMode::Quote, _) => &self.quote,
            (TestMode::Words, Difficulty::Hard) => &self.hard,
            (TestMode::Words, _) => &self.simple,
        }
    }

    /// Pick a prompt for the test. Words mode is cut down to the configured word count.
    pub fn text_sample<R: Rng + ?Sized>(&self, config: &TestConfig, rng: &mut R) -> String {
        let sample = self
            .collection(config.mode, config.difficulty)
            .choose(rng)
            .cloned()
            .unwrap_or_default();

        if config.mode == TestMode::Words {
            let words: Vec<&str> = sample.split(' ').collect();
            if words.len() > config.word_count {
                return words[..config.word_count].join(" ");
            }
        }

        sample
    }
}

/// Split a prompt into the words the test walks through
pub fn split_words(text: &str) -> Vec<String> {
    text.split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn config(mode: TestMode, difficulty: Difficulty, word_count: usize) -> TestConfig {
        TestConfig {
            mode,
            difficulty,
            duration_secs: 30,
            word_count,
        }
    }

    #[test]
    fn test_embedded_samples_load() {
        let set = SampleSet::embedded().unwrap();
        assert_eq!(set.simple.len(), 5);
        assert_eq!(set.time.len(), 5);
        assert_eq!(set.quote.len(), 5);
        assert_eq!(set.hard.len(), 5);
    }

    #[test]
    fn test_collection_routing() {
        let set = SampleSet::embedded().unwrap();
        assert_eq!(
            set.collection(TestMode::Time, Difficulty::Hard),
            set.time.as_slice()
        );
        assert_eq!(
            set.collection(TestMode::Quote, Difficulty::Easy),
            set.quote.as_slice()
        );
        assert_eq!(
            set.collection(TestMode::Quote, Difficulty::Hard),
            set.hard.as_slice()
        );
        assert_eq!(
            set.collection(TestMode::Words, Difficulty::Medium),
            set.simple.as_slice()
        );
        assert_eq!(
            set.collection(TestMode::Words, Difficulty::Hard),
            set.hard.as_slice()
        );
    }

    #[test]
    fn test_words_mode_truncates() {
        let set = SampleSet::embedded().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let text = set.text_sample(&config(TestMode::Words, Difficulty::Easy, 10), &mut rng);
        assert_eq!(split_words(&text).len(), 10);
    }

    #[test]
    fn test_words_mode_short_sample_is_kept_whole() {
        let set = SampleSet::from_json(
            r#"{"simple":["one two three"],"time":["a"],"quote":["b"],"hard":["c"]}"#,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let text = set.text_sample(&config(TestMode::Words, Difficulty::Easy, 25), &mut rng);
        assert_eq!(text, "one two three");
    }

    #[test]
    fn test_time_mode_uses_full_sample() {
        let set = SampleSet::embedded().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let text = set.text_sample(&config(TestMode::Time, Difficulty::Easy, 10), &mut rng);
        assert!(set.time.contains(&text));
    }

    #[test]
    fn test_empty_collection_is_rejected() {
        let err = SampleSet::from_json(r#"{"simple":[],"time":["a"],"quote":["b"],"hard":["c"]}"#)
            .unwrap_err();
        assert!(matches!(err, TextError::Empty("simple")));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(matches!(
            SampleSet::from_json("not json"),
            Err(TextError::Parse(_))
        ));
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("a  b c"), vec!["a", "b", "c"]);
        assert!(split_words("").is_empty());
    }
}
