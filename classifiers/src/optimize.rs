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

//! A limited memory BFGS minimizer for smooth objectives.

use std::collections::VecDeque;
use crate::classifier::Convergence;

const ARMIJO_C1: f64 = 1e-4;
const MAX_LINE_SEARCH_STEPS: usize = 30;
const MIN_CURVATURE: f64 = 1e-10;
/// Relative change of the objective that counts as converged.
const RELATIVE_FUNCTION_TOLERANCE: f64 = 1e7 * f64::EPSILON;

/// A function with a gradient.
pub trait DifferentiableFunction {
    fn dimension(&self) -> usize;

    /// Returns the value at [x] and writes the gradient to [gradient].
    fn evaluate(&self, x: &[f64], gradient: &mut [f64]) -> f64;
}

#[derive(Debug, Copy, Clone)]
pub struct LbfgsOptions {
    pub max_iter: usize,
    /// Largest absolute gradient component that counts as converged.
    pub tolerance: f64,
    /// Number of correction pairs to keep.
    pub history: usize,
}

#[derive(Debug, Clone)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    pub convergence: Convergence,
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(a, b)| a * b).sum()
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0f64, |acc, value| acc.max(value.abs()))
}

struct CorrectionPair {
    s: Vec<f64>,
    y: Vec<f64>,
    rho: f64,
}

/// Two loop recursion, returns the descent direction `-H * gradient`.
fn search_direction(gradient: &[f64], history: &VecDeque<CorrectionPair>) -> Vec<f64> {
    let mut q = gradient.to_vec();
    let mut alphas = Vec::with_capacity(history.len());
    for pair in history.iter().rev() {
        let alpha = pair.rho * dot(&pair.s, &q);
        q.iter_mut().zip(&pair.y).for_each(|(q, y)| *q -= alpha * y);
        alphas.push(alpha);
    }
    if let Some(last) = history.back() {
        let gamma = dot(&last.s, &last.y) / dot(&last.y, &last.y);
        q.iter_mut().for_each(|q| *q *= gamma);
    }
    for (pair, alpha) in history.iter().zip(alphas.into_iter().rev()) {
        let beta = pair.rho * dot(&pair.y, &q);
        q.iter_mut().zip(&pair.s).for_each(|(q, s)| *q += (alpha - beta) * s);
    }
    q.iter_mut().for_each(|q| *q = -*q);
    q
}

/// Minimizes [function] starting at the origin.
pub fn minimize<F: DifferentiableFunction>(function: &F, options: &LbfgsOptions) -> Minimum {
    let dimension = function.dimension();
    let mut x = vec![0.0; dimension];
    let mut gradient = vec![0.0; dimension];
    let mut value = function.evaluate(&x, &mut gradient);
    let mut history: VecDeque<CorrectionPair> = VecDeque::with_capacity(options.history);

    let mut next_x = vec![0.0; dimension];
    let mut next_gradient = vec![0.0; dimension];

    for iteration in 0..options.max_iter {
        if max_abs(&gradient) <= options.tolerance {
            return Minimum { x, value, convergence: Convergence::Converged { iterations: iteration } }
        }

        let mut direction = search_direction(&gradient, &history);
        let mut slope = dot(&direction, &gradient);
        if slope >= 0.0 {
            log::trace!("Resetting the history, no descent direction in iteration {iteration}.");
            history.clear();
            direction = gradient.iter().map(|g| -g).collect();
            slope = -dot(&gradient, &gradient);
        }

        let mut step = if history.is_empty() {
            (1.0 / dot(&gradient, &gradient).sqrt()).min(1.0)
        } else {
            1.0
        };
        let mut next_value = f64::INFINITY;
        let mut accepted = false;
        for _ in 0..MAX_LINE_SEARCH_STEPS {
            next_x.iter_mut()
                .zip(x.iter().zip(&direction))
                .for_each(|(next, (x, d))| *next = x + step * d);
            next_value = function.evaluate(&next_x, &mut next_gradient);
            if next_value <= value + ARMIJO_C1 * step * slope {
                accepted = true;
                break;
            }
            step *= 0.5;
        }
        if !accepted {
            log::debug!("The line search failed in iteration {iteration}, stopping at {value}.");
            return finish(x, value, &gradient, iteration, options.tolerance)
        }

        let s = next_x.iter().zip(&x).map(|(next, x)| next - x).collect::<Vec<_>>();
        let y = next_gradient.iter().zip(&gradient).map(|(next, g)| next - g).collect::<Vec<_>>();
        let curvature = dot(&s, &y);
        if curvature > MIN_CURVATURE {
            if history.len() == options.history {
                history.pop_front();
            }
            history.push_back(CorrectionPair { s, y, rho: 1.0 / curvature });
        }

        let relative_change = (value - next_value) / value.abs().max(next_value.abs()).max(1.0);
        std::mem::swap(&mut x, &mut next_x);
        std::mem::swap(&mut gradient, &mut next_gradient);
        value = next_value;

        if relative_change <= RELATIVE_FUNCTION_TOLERANCE {
            return Minimum { x, value, convergence: Convergence::Converged { iterations: iteration + 1 } }
        }
    }

    finish(x, value, &gradient, options.max_iter, options.tolerance)
}

fn finish(x: Vec<f64>, value: f64, gradient: &[f64], iterations: usize, tolerance: f64) -> Minimum {
    let gradient_norm = max_abs(gradient);
    let convergence = if gradient_norm <= tolerance {
        Convergence::Converged { iterations }
    } else {
        Convergence::NotConverged { iterations, gradient_norm }
    };
    Minimum { x, value, convergence }
}
