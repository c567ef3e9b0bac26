use std::collections::HashSet;
use std::fmt;

use clap::ValueEnum;

/// How a candidate image's layers are compared against its purported base.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, ValueEnum)]
pub enum MatchPolicy {
    /// Any parent layer appearing anywhere in the candidate is a match.
    AnyCommonLayer,
    /// The candidate must contain at least `len(child) - len(parent)` parent layers.
    ///
    /// When the parent has at least as many layers as the child the threshold is
    /// zero or negative, so every pair matches.
    SufficientPrefixCount,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        MatchPolicy::AnyCommonLayer
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::AnyCommonLayer => f.write_str("any-common-layer"),
            MatchPolicy::SufficientPrefixCount => f.write_str("sufficient-prefix-count"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MatchReport {
    pub policy: MatchPolicy,
    pub matched: bool,
    /// Child layers that are also present in the parent, counted per occurrence.
    pub common_layers: usize,
    /// Only set for [`MatchPolicy::SufficientPrefixCount`].
    pub required_common_layers: Option<i64>,
}

impl MatchReport {
    pub fn summary(&self) -> &'static str {
        match (self.policy, self.matched) {
            (_, true) => "Matching common layers found",
            (MatchPolicy::AnyCommonLayer, false) => "No common layers found",
            (MatchPolicy::SufficientPrefixCount, false) => "Not enough common layers found",
        }
    }
}

pub fn evaluate<S: AsRef<str>>(policy: MatchPolicy, child: &[S], parent: &[S]) -> MatchReport {
    let parent_layers: HashSet<&str> = parent.iter().map(|e| e.as_ref()).collect();
    let common_layers = child
        .iter()
        .filter(|e| parent_layers.contains(e.as_ref()))
        .count();

    match policy {
        MatchPolicy::AnyCommonLayer => MatchReport {
            policy,
            matched: common_layers > 0,
            common_layers,
            required_common_layers: None,
        },
        MatchPolicy::SufficientPrefixCount => {
            let required = child.len() as i64 - parent.len() as i64;
            MatchReport {
                policy,
                matched: common_layers as i64 >= required,
                common_layers,
                required_common_layers: Some(required),
            }
        }
    }
}

pub fn layers_match<S: AsRef<str>>(policy: MatchPolicy, child: &[S], parent: &[S]) -> bool {
    evaluate(policy, child, parent).matched
}
