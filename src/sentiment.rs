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

use std::fmt::{Display, Formatter};

/// The polarity of a tweet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Interprets a sentiment code of the dataset.
    /// Every code except 0 and 2 counts as positive.
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Sentiment::Negative,
            2 => Sentiment::Neutral,
            _ => Sentiment::Positive,
        }
    }
}

impl Display for Sentiment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Negative => write!(f, "Negative"),
            Sentiment::Neutral => write!(f, "Neutral"),
            Sentiment::Positive => write!(f, "Positive"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Sentiment;

    #[test]
    fn maps_codes(){
        assert_eq!(Sentiment::Negative, Sentiment::from_code(0));
        assert_eq!(Sentiment::Neutral, Sentiment::from_code(2));
        assert_eq!(Sentiment::Positive, Sentiment::from_code(4));
        assert_eq!(Sentiment::Positive, Sentiment::from_code(1));
        assert_eq!(Sentiment::Positive, Sentiment::from_code(-7));
        assert_eq!("Neutral", Sentiment::from_code(2).to_string());
    }
}
