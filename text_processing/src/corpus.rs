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

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::hash::Hash;
use itertools::Itertools;

/// The statistics over the documents in a corpus
pub trait CorpusDocumentStatistics {
    /// A word in a corpus
    type Word;
    /// The number of documents in the corpus
    fn document_count(&self) -> u64;
    /// The number of tokens in the corpus
    fn token_count(&self) -> u64;
    /// The number of unique words in the corpus
    fn unique_word_count(&self) -> usize;
    /// The number of documents containing [word]
    fn document_frequency(&self, word: &Self::Word) -> Option<u64>;

    /// Returns an iterator over the words and their document frequencies
    fn iter(&self) -> impl Iterator<Item=(&Self::Word, &u64)>;
}

/// Collects the document frequencies in a corpus
#[derive(Debug, Default, Clone)]
pub struct CorpusStatisticsCollector<W> {
    document_count: u64,
    token_count: u64,
    document_frequencies: HashMap<W, u64>
}

impl<W> CorpusStatisticsCollector<W> where W: Hash + Eq {
    /// Adds a document, every distinct word counts once for the document frequency.
    pub fn add<D: IntoIterator<Item=W>>(&mut self, doc: D) {
        self.document_count = self.document_count.saturating_add(1);
        let mut distinct = HashSet::new();
        for value in doc {
            self.token_count = self.token_count.saturating_add(1);
            distinct.insert(value);
        }
        for value in distinct {
            self.document_frequencies
                .entry(value)
                .and_modify(|value| *value = value.saturating_add(1))
                .or_insert(1);
        }
    }
}

impl<W> Display for CorpusStatisticsCollector<W> where W: Hash + Eq + Ord + Display  {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Document Count: {}", self.document_count)?;
        writeln!(f, "Token Count: {}", self.token_count)?;
        writeln!(f, "Unique Word Count: {}", self.unique_word_count())?;
        write!(f, "Words:")?;
        for (word, count) in self.document_frequencies.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            write!(f, "\n  {word}: {count}")?;
        }
        Ok(())
    }
}

impl<W> CorpusDocumentStatistics for CorpusStatisticsCollector<W> where W: Hash + Eq {
    type Word = W;

    #[inline]
    fn document_count(&self) -> u64 {
        self.document_count
    }

    #[inline]
    fn token_count(&self) -> u64 {
        self.token_count
    }

    #[inline]
    fn unique_word_count(&self) -> usize {
        self.document_frequencies.len()
    }

    fn document_frequency(&self, word: &W) -> Option<u64> {
        self.document_frequencies.get(word).copied()
    }

    fn iter(&self) -> impl Iterator<Item=(&Self::Word, &u64)> {
        self.document_frequencies.iter()
    }
}
