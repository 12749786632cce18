//! Import remappings: `[context:]prefix=[target]` rules and their
//! selection engine.
//!
//! A rule rewrites the leading `prefix` of a candidate source unit name
//! into `target`, but only for importers whose own name starts with
//! `context`. Rules are kept in declaration order; selection is by longest
//! prefix, with ties going to the rule declared last.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A single remapping rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remapping {
    /// Importer-name prefix gating the rule. Empty matches every importer.
    pub context: String,
    /// Candidate-name prefix to replace. Never empty.
    pub prefix: String,
    /// Replacement text. No separator is inserted: a target without a
    /// trailing `/` concatenates directly with the remainder.
    pub target: String,
}

impl FromStr for Remapping {
    type Err = Error;

    /// Parse `[context:]prefix=[target]`.
    ///
    /// The first `=` splits the left-hand side from the target. On the
    /// left-hand side, a `:` in the first column denotes an empty context;
    /// otherwise the first `:` delimits context from prefix. That means
    /// `https://h/=x` parses as context `https`, prefix `//h/`; write
    /// `:https://h/=x` to remap a scheme-like prefix with no context.
    /// An empty target defaults to the prefix (identity remap).
    fn from_str(rule: &str) -> Result<Self> {
        let (lhs, target) = match rule.find('=') {
            Some(idx) => (&rule[..idx], &rule[idx + 1..]),
            None => {
                return Err(Error::InvalidRemapping {
                    rule: rule.to_string(),
                    reason: "missing '='".to_string(),
                })
            }
        };

        let (context, prefix) = match lhs.find(':') {
            Some(0) => ("", &lhs[1..]),
            Some(idx) => (&lhs[..idx], &lhs[idx + 1..]),
            None => ("", lhs),
        };

        if prefix.is_empty() {
            return Err(Error::InvalidRemapping {
                rule: rule.to_string(),
                reason: "empty prefix".to_string(),
            });
        }

        let target = if target.is_empty() { prefix } else { target };

        Ok(Remapping {
            context: context.to_string(),
            prefix: prefix.to_string(),
            target: target.to_string(),
        })
    }
}

impl fmt::Display for Remapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}={}", self.prefix, self.target)
        } else {
            write!(f, "{}:{}={}", self.context, self.prefix, self.target)
        }
    }
}

/// The ordered remapping list of a session.
#[derive(Debug, Default)]
pub struct Remappings {
    rules: Vec<Remapping>,
}

impl Remappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rule: Remapping) {
        self.rules.push(rule);
    }

    pub fn parse_and_add(&mut self, rule: &str) -> Result<()> {
        self.add(rule.parse()?);
        Ok(())
    }

    /// Apply at most one remapping to `candidate`.
    ///
    /// A rule matches when `importer` starts with its context and
    /// `candidate` starts with its prefix. Among matches the longest
    /// prefix wins; equal lengths go to the rule declared last. The
    /// winning rule replaces exactly the leading prefix with its target,
    /// without normalization and without cascading into other rules. With
    /// no match the candidate is returned unchanged.
    pub fn rewrite(&self, importer: &str, candidate: &str) -> String {
        let mut winner: Option<&Remapping> = None;
        for rule in &self.rules {
            if !importer.starts_with(rule.context.as_str()) {
                continue;
            }
            if !candidate.starts_with(rule.prefix.as_str()) {
                continue;
            }
            match winner {
                Some(best) if rule.prefix.len() < best.prefix.len() => {}
                _ => winner = Some(rule),
            }
        }

        match winner {
            Some(rule) => format!("{}{}", rule.target, &candidate[rule.prefix.len()..]),
            None => candidate.to_string(),
        }
    }

    /// Rules in declaration order, exactly as configured.
    pub fn iter(&self) -> impl Iterator<Item = &Remapping> {
        self.rules.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
