use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Output widths of the convolution stages, in order, as encoded in a model name.
///
/// A plan is never empty and never holds a zero width.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct ChannelPlan(Vec<usize>);

impl ChannelPlan {
    pub fn new(widths: Vec<usize>) -> Result<Self, ModelError> {
        if widths.is_empty() {
            return Err(ModelError::EmptyPlan);
        }
        if widths.contains(&0) {
            return Err(ModelError::ZeroWidth(widths));
        }
        Ok(Self(widths))
    }

    /// Reads the plan out of a name of the form `<prefix>_<N1>[_<N2>...]`.
    ///
    /// Every width token must consist of ASCII digits only and denote a positive number.
    pub fn parse(prefix: &str, name: &str) -> Result<Self, ModelError> {
        let invalid = || ModelError::InvalidModelName(name.to_owned());
        let tokens = name
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('_'))
            .ok_or_else(invalid)?;

        let widths = tokens
            .split('_')
            .map(parse_width)
            .collect::<Option<Vec<usize>>>()
            .ok_or_else(invalid)?;
        Self::new(widths).map_err(|_| invalid())
    }

    pub fn widths(&self) -> &[usize] {
        &self.0
    }

    /// Number of conv/pool stages.
    pub fn stages(&self) -> usize {
        self.0.len()
    }

    pub fn last_width(&self) -> usize {
        // Non-empty by construction.
        self.0[self.0.len() - 1]
    }

    pub fn model_name(&self, prefix: &str) -> String {
        format!("{prefix}_{self}")
    }
}

fn parse_width(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok().filter(|&width| width > 0)
}

/// Whether `name` is `prefix` followed by one or more positive integer width tokens.
pub fn is_valid_model_name(prefix: &str, name: &str) -> bool {
    ChannelPlan::parse(prefix, name).is_ok()
}

impl TryFrom<Vec<usize>> for ChannelPlan {
    type Error = ModelError;

    fn try_from(widths: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(widths)
    }
}

impl From<ChannelPlan> for Vec<usize> {
    fn from(plan: ChannelPlan) -> Self {
        plan.0
    }
}

impl Display for ChannelPlan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tokens: Vec<String> = self.0.iter().map(usize::to_string).collect();
        write!(f, "{}", tokens.join("_"))
    }
}
