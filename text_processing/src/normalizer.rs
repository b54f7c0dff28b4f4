//Copyright 2024 Felix Engl
//
//Licensed under the Apache License, Version 2.0 (the "License");
//you may not use this file except in compliance with the License.
//You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
//Unless required by applicable law or agreed to in writing, software
//distributed under the License is distributed on an "AS IS" BASIS,
//WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//See the License for the specific language governing permissions and
//limitations under the License.

use std::fmt::{Debug, Formatter};
use std::sync::{Arc, LazyLock};
use itertools::Itertools;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use crate::configs::NormalizerConfig;
use crate::stopword_registry::{ContainsKind, StopWordList, StopWordRegistry};

static URLS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"http\S+|www\S+|https\S+").expect("The url pattern is valid")
});

static MENTIONS_AND_HASHES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@\w+|#").expect("The mention pattern is valid")
});

/// Cleans short social media texts.
///
/// The steps are applied in a fixed order:
/// 1. unicode normalisation (optional)
/// 2. lowercasing
/// 3. removal of urls
/// 4. removal of `@mentions` and of the `#` marker (the hashtag text stays)
/// 5. removal of ascii punctuation
/// 6. whitespace tokenization
/// 7. stopword removal (optional)
/// 8. stemming (optional)
///
/// The normalizer owns its stemmer and shares the stopwords, it never fails.
pub struct TextNormalizer {
    normalize: bool,
    stop_words: Option<Arc<StopWordList>>,
    stemmer: Option<(Algorithm, Stemmer)>,
}

impl Debug for TextNormalizer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("normalize", &self.normalize)
            .field("stop_words", &self.stop_words.as_ref().map(|value| value.len()))
            .field("stemmer", &self.stemmer.as_ref().map(|(algorithm, _)| algorithm))
            .finish()
    }
}

impl TextNormalizer {
    pub fn new(
        normalize: bool,
        stop_words: Option<Arc<StopWordList>>,
        stemmer: Option<Algorithm>
    ) -> Self {
        Self {
            normalize,
            stop_words,
            stemmer: stemmer.map(|algorithm| (algorithm, Stemmer::create(algorithm))),
        }
    }

    /// Creates the normalizer described by [cfg], the stopwords are resolved with [registry].
    pub fn from_config(cfg: &NormalizerConfig, registry: &StopWordRegistry) -> Self {
        let stop_words = cfg.stopword_language.as_ref().and_then(|language| {
            let found = registry.get_or_load(language);
            if found.is_none() {
                log::warn!("No stopwords found for {}, stopwords will not be removed!", language.to_name());
            }
            found
        });
        Self::new(cfg.normalize_text, stop_words, cfg.stemmer)
    }

    pub fn stop_words(&self) -> Option<&Arc<StopWordList>> {
        self.stop_words.as_ref()
    }

    /// Cleans [text] and splits it into tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.normalize {
            text.nfc().collect::<String>().to_lowercase()
        } else {
            text.to_lowercase()
        };

        let text = URLS.replace_all(&text, "");
        let text = MENTIONS_AND_HASHES.replace_all(&text, "");
        let text = text.chars().filter(|value| !value.is_ascii_punctuation()).collect::<String>();

        let tokens = text.split_whitespace();

        let tokens = if let Some(stop_words) = &self.stop_words {
            let target = if self.normalize {
                ContainsKind::Normalized
            } else {
                ContainsKind::Raw
            };
            tokens.filter(|value| !stop_words.contains(target, *value)).collect_vec()
        } else {
            tokens.collect_vec()
        };

        match &self.stemmer {
            Some((_, stemmer)) => tokens.into_iter().map(|value| stemmer.stem(value).into_owned()).collect_vec(),
            None => tokens.into_iter().map(str::to_string).collect_vec(),
        }
    }

    /// Cleans [text] and returns the tokens joined by a single space.
    pub fn normalize(&self, text: &str) -> String {
        self.tokenize(text).join(" ")
    }
}
