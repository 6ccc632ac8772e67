use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::error::StepError;

/// A point in training, counted in iterations but readable in epochs.
///
/// Step strings take one of three forms: `"<N>ep"`, `"<M>it"` or `"<N>ep<M>it"`. Counts are
/// written without leading zeros, so `"03ep"` is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Step {
    iteration: u64,
    iterations_per_epoch: u64,
}

impl Step {
    pub fn from_iteration(iteration: u64, iterations_per_epoch: u64) -> Result<Self, StepError> {
        if iterations_per_epoch == 0 {
            return Err(StepError::ZeroIterationsPerEpoch);
        }
        Ok(Self {
            iteration,
            iterations_per_epoch,
        })
    }

    pub fn from_epoch(
        epoch: u64,
        iteration: u64,
        iterations_per_epoch: u64,
    ) -> Result<Self, StepError> {
        let absolute = epoch
            .checked_mul(iterations_per_epoch)
            .and_then(|start| start.checked_add(iteration))
            .ok_or(StepError::Overflow {
                epoch,
                iteration,
                iterations_per_epoch,
            })?;
        Self::from_iteration(absolute, iterations_per_epoch)
    }

    pub fn zero(iterations_per_epoch: u64) -> Result<Self, StepError> {
        Self::from_iteration(0, iterations_per_epoch)
    }

    pub fn from_step_str(step: &str, iterations_per_epoch: u64) -> Result<Self, StepError> {
        let (epoch, iteration) = parse_step_str(step)?;
        Self::from_epoch(epoch, iteration, iterations_per_epoch)
    }

    /// Whether the string denotes the very first step, regardless of the epoch length.
    pub fn str_is_zero(step: &str) -> bool {
        matches!(parse_step_str(step), Ok((0, 0)))
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn iterations_per_epoch(&self) -> u64 {
        self.iterations_per_epoch
    }

    /// Completed epochs.
    pub fn ep(&self) -> u64 {
        self.iteration / self.iterations_per_epoch
    }

    /// Iterations into the current epoch.
    pub fn it(&self) -> u64 {
        self.iteration % self.iterations_per_epoch
    }

    pub fn try_cmp(&self, other: &Step) -> Result<Ordering, StepError> {
        if self.iterations_per_epoch != other.iterations_per_epoch {
            return Err(StepError::MismatchedEpochLength(
                self.iterations_per_epoch,
                other.iterations_per_epoch,
            ));
        }
        Ok(self.iteration.cmp(&other.iteration))
    }
}

impl PartialOrd for Step {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ep{}it", self.ep(), self.it())
    }
}

/// Splits a step string into its epoch and iteration counts.
pub fn parse_step_str(step: &str) -> Result<(u64, u64), StepError> {
    let invalid = || StepError::InvalidStepString(step.to_owned());

    let (epochs, rest) = match step.split_once("ep") {
        Some((epochs, rest)) => (parse_count(epochs).ok_or_else(invalid)?, rest),
        None => (0, step),
    };
    if rest.is_empty() {
        return if step.ends_with("ep") {
            Ok((epochs, 0))
        } else {
            Err(invalid())
        };
    }
    let iterations = rest
        .strip_suffix("it")
        .and_then(parse_count)
        .ok_or_else(invalid)?;
    Ok((epochs, iterations))
}

fn parse_count(digits: &str) -> Option<u64> {
    let canonical = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));
    if !canonical {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_three_forms() {
        assert_eq!(parse_step_str("3ep"), Ok((3, 0)));
        assert_eq!(parse_step_str("250it"), Ok((0, 250)));
        assert_eq!(parse_step_str("2ep40it"), Ok((2, 40)));
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in ["", "ep", "it", "3", "3epit", "03ep", "3it2ep", "-1ep", "3ep ", "1.5ep"] {
            assert!(parse_step_str(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn zero_strings() {
        assert!(Step::str_is_zero("0ep"));
        assert!(Step::str_is_zero("0it"));
        assert!(Step::str_is_zero("0ep0it"));
        assert!(!Step::str_is_zero("0ep1it"));
    }
}
