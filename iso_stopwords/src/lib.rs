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

//! Static stopword lists, addressed by their iso language.

use isolang::Language;

mod english;

/// Returns the builtin stopword list for [language], if one is bundled.
pub fn iso_stopwords_for(language: &Language) -> Option<&'static [&'static str]> {
    match language {
        Language::Eng => Some(english::STOPWORDS),
        _ => None,
    }
}

/// All languages with a bundled stopword list.
pub fn supported_languages() -> &'static [Language] {
    &[Language::Eng]
}
