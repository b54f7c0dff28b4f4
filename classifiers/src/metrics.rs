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

use crate::classifier::Label;
use crate::error::EvaluationError;

/// The share of [predicted] labels equal to the [expected] ones.
pub fn accuracy(expected: &[Label], predicted: &[Label]) -> Result<f64, EvaluationError> {
    if expected.len() != predicted.len() {
        return Err(EvaluationError::LabelCountMismatch { rows: expected.len(), labels: predicted.len() })
    }
    if expected.is_empty() {
        return Err(EvaluationError::NothingToScore)
    }
    let hits = expected.iter().zip(predicted).filter(|(a, b)| a == b).count();
    Ok(hits as f64 / expected.len() as f64)
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;
    use crate::error::EvaluationError;
    use super::accuracy;

    #[test]
    fn counts_exact_matches(){
        assert_approx_eq!(f64, 1.0, accuracy(&[0, 4], &[0, 4]).unwrap());
        assert_approx_eq!(f64, 0.5, accuracy(&[0, 4], &[0, 0]).unwrap());
        assert_approx_eq!(f64, 0.0, accuracy(&[2, 4, 0], &[0, 0, 2]).unwrap());
    }

    #[test]
    fn rejects_nothing(){
        assert_eq!(Err(EvaluationError::NothingToScore), accuracy(&[], &[]));
        assert_eq!(Err(EvaluationError::LabelCountMismatch { rows: 1, labels: 2 }), accuracy(&[0], &[0, 4]));
    }
}
