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

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Entry;
use std::fs::File;
use std::hash::Hash;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use camino::Utf8PathBuf;
use compact_str::{CompactString, ToCompactString};
use isolang::Language;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use iso_stopwords::iso_stopwords_for;

use crate::configs::StopwordRegistryConfig;


/// A registry for stopwords.
///
/// Every registered repository is asked for the requested language, the
/// resulting list is the union of all answers. Loaded lists are cached and shared.
#[derive(Debug, Default, Clone)]
pub struct StopWordRegistry {
    cached_stop_words: Arc<RwLock<HashMap<Language, Arc<StopWordList>>>>,
    repositories: Arc<RwLock<Vec<StopWordRepository>>>
}

impl StopWordRegistry {
    pub fn initialize(cfg: &StopwordRegistryConfig) -> Self {
        let new = Self::default();
        new.repositories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(cfg.iter().cloned());
        new
    }

    pub fn register(&mut self, repository: StopWordRepository) {
        self.repositories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(repository)
    }

    fn load_stop_words(&self, language: &Language) -> Option<Vec<String>> {
        let read = self.repositories.read().unwrap_or_else(PoisonError::into_inner);
        let collection = read
            .iter()
            .filter_map(|repo| repo.load_raw_stop_words(language))
            .flatten()
            .collect_vec();
        (!collection.is_empty()).then_some(collection)
    }

    /// Returns the cached list for [language] or loads it from the repositories.
    /// Returns None if no repository knows the language.
    pub fn get_or_load(&self, language: &Language) -> Option<Arc<StopWordList>> {
        let lock = self.cached_stop_words.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(found) = lock.get(language).cloned() {
            return Some(found);
        }
        drop(lock);
        let mut lock = self.cached_stop_words.write().unwrap_or_else(PoisonError::into_inner);
        match lock.entry(language.clone()) {
            Entry::Occupied(value) => {
                Some(value.get().clone())
            }
            Entry::Vacant(value) => {
                let raw = self.load_stop_words(language)?;
                log::debug!("Loaded {} stopwords for {}.", raw.len(), language.to_name());
                Some(value.insert(Arc::new(StopWordList::from_iter(raw))).clone())
            }
        }
    }
}


/// An immutable set of stopwords, kept in the raw and the NFC normalized form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopWordList {
    raw: HashSet<CompactString>,
    normalized: HashSet<CompactString>
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ContainsKind {
    Raw,
    Normalized,
    Both
}

impl StopWordList {
    pub fn from_raw(mut raw: HashSet<CompactString>) -> Self {
        let mut normalized = raw
            .iter()
            .map(|value| value.nfc().collect::<CompactString>())
            .collect::<HashSet<_>>();
        raw.shrink_to_fit();
        normalized.shrink_to_fit();
        Self { raw, normalized }
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[inline]
    pub fn contains<Q: ?Sized>(&self, kind: ContainsKind, value: &Q) -> bool
    where
        CompactString: Borrow<Q>,
        Q: Hash + Eq, {
        match kind {
            ContainsKind::Raw => self.raw.contains(value),
            ContainsKind::Normalized => self.normalized.contains(value),
            ContainsKind::Both => self.raw.contains(value) || self.normalized.contains(value),
        }
    }
}

impl<Q> FromIterator<Q> for StopWordList where Q: ToCompactString {
    fn from_iter<T: IntoIterator<Item=Q>>(iter: T) -> Self {
        Self::from_raw(iter.into_iter().map(|value| value.to_compact_string()).collect())
    }
}


/// A source of stopword lists.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq)]
#[serde(tag = "kind")]
pub enum StopWordRepository {
    /// The lists bundled with [iso_stopwords].
    IsoDefault,
    /// A directory with `<iso 639-3>.txt` or `<iso 639-1>.txt` files, one word per line.
    #[serde(alias = "Directory")]
    DirRepo {
        #[serde(default, rename = "iso_default")]
        with_iso_default: bool,
        dir: Utf8PathBuf
    },
    /// A single file with the words of a single language, one word per line.
    File {
        #[serde(default, rename = "iso_default")]
        with_iso_default: bool,
        language: Language,
        file: Utf8PathBuf
    },
}

/// Provides stop word lists for a specific language
pub trait StopWordListRepository {
    fn load_raw_stop_words(&self, language: &Language) -> Option<Vec<String>>;
}

fn builtin(language: &Language) -> Option<Vec<String>> {
    Some(iso_stopwords_for(language)?.iter().map(|value| str::to_owned(value)).collect_vec())
}

fn read_lines(file: impl AsRef<Path>, with_iso_default: bool, language: &Language) -> Option<Vec<String>> {
    let mut result = BufReader::new(File::open(file).ok()?)
        .lines()
        .map_ok(|line| line.trim().to_string())
        .filter_ok(|line| !line.is_empty())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    if with_iso_default {
        result.extend(builtin(language).unwrap_or_default())
    }
    Some(result)
}

impl StopWordListRepository for StopWordRepository {
    fn load_raw_stop_words(&self, language: &Language) -> Option<Vec<String>> {
        match self {
            StopWordRepository::IsoDefault => builtin(language),
            StopWordRepository::DirRepo { dir, with_iso_default } => {
                let found = [Some(language.to_639_3()), language.to_639_1()]
                    .into_iter()
                    .flatten()
                    .map(|code| dir.join(format!("{code}.txt")))
                    .find(|path| path.exists());
                match found {
                    Some(file) => read_lines(file, *with_iso_default, language),
                    None => {
                        log::warn!("No stopword file for {} in {}! Falling back to iso only if selected for the repo!", language.to_name(), dir);
                        with_iso_default.then(|| builtin(language)).flatten()
                    }
                }
            }
            StopWordRepository::File { file, language: file_lang, with_iso_default } => {
                if language != file_lang {
                    None
                } else if file.exists() {
                    read_lines(file, *with_iso_default, language)
                } else {
                    log::warn!("The file {} does not exist! Falling back to iso only if selected for the repo!", file);
                    with_iso_default.then(|| builtin(language)).flatten()
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;
    use std::sync::Arc;
    use camino_tempfile::tempdir;
    use isolang::Language;
    use super::{ContainsKind, StopWordList, StopWordRegistry, StopWordRepository};
    use crate::configs::StopwordRegistryConfig;

    #[test]
    fn iso_default_provides_english(){
        let registry = StopWordRegistry::initialize(&StopwordRegistryConfig::default());
        let list = registry.get_or_load(&Language::Eng).expect("English is bundled!");
        assert!(list.contains(ContainsKind::Both, "and"));
        assert!(!list.contains(ContainsKind::Both, "sunny"));
        assert!(registry.get_or_load(&Language::Deu).is_none());
    }

    #[test]
    fn lists_are_cached(){
        let registry = StopWordRegistry::initialize(&StopwordRegistryConfig::default());
        let a = registry.get_or_load(&Language::Eng).unwrap();
        let b = registry.get_or_load(&Language::Eng).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn file_repository_merges_with_iso(){
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "lol").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  omg  ").unwrap();
        drop(file);

        let mut registry = StopWordRegistry::default();
        registry.register(StopWordRepository::File { with_iso_default: true, language: Language::Eng, file: path });
        let list = registry.get_or_load(&Language::Eng).unwrap();
        assert!(list.contains(ContainsKind::Raw, "lol"));
        assert!(list.contains(ContainsKind::Raw, "omg"));
        assert!(list.contains(ContainsKind::Raw, "the"));
        assert!(!list.contains(ContainsKind::Raw, ""));
    }

    #[test]
    fn dir_repository_without_file_falls_back(){
        let dir = tempdir().unwrap();
        let mut registry = StopWordRegistry::default();
        registry.register(StopWordRepository::DirRepo { with_iso_default: false, dir: dir.path().to_path_buf() });
        assert!(registry.get_or_load(&Language::Eng).is_none());

        let mut registry = StopWordRegistry::default();
        registry.register(StopWordRepository::DirRepo { with_iso_default: true, dir: dir.path().to_path_buf() });
        assert!(registry.get_or_load(&Language::Eng).is_some());
    }

    #[test]
    fn dir_repository_reads_iso_639_1_names(){
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("en.txt"), "meh\nugh\n").unwrap();
        let mut registry = StopWordRegistry::default();
        registry.register(StopWordRepository::DirRepo { with_iso_default: false, dir: dir.path().to_path_buf() });
        let list = registry.get_or_load(&Language::Eng).unwrap();
        assert_eq!(2, list.len());
        assert!(list.contains(ContainsKind::Normalized, "ugh"));
    }

    #[test]
    fn list_from_iter(){
        let list: StopWordList = ["a", "the", "a"].into_iter().collect();
        assert_eq!(2, list.len());
        assert!(!list.is_empty());
    }
}
