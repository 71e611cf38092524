//! ## Background
//!
//! A query compiler spends most of its optimization time rewriting trees: logical plans made of
//! relational operators, and the scalar expressions embedded in those operators. This crate is
//! the rewriting core. It does not parse sql, resolve names or produce physical plans, it only
//! knows how to represent resolved trees, transform them functionally and drive rewrite rules
//! until the plan stops changing.
//!
//! Trees are immutable. Every transformation returns a new tree, or the very same [`Arc`] when
//! nothing changed. Reference identity is therefore a cheap and correct "did anything happen"
//! test, and the rule executor relies on it to detect fixed points.
//!
//! ## Design
//!
//! * [`tree`] Generic tree abstraction shared by plans and expressions.
//! * [`expr`] Scalar expressions and expression ids.
//! * [`operator`] Relational operators carried by plan nodes.
//! * [`plan`] Plan nodes and expression aware traversal.
//! * [`properties`] Derived logical properties of plan nodes.
//! * [`normalize`] Canonicalization of expression ids.
//! * [`rules`] Rewrite rule definition and built-in rules.
//! * [`executor`] Batch based rule executor.
//!
//! [`Arc`]: std::sync::Arc

#[macro_use]
extern crate prettytable;
#[macro_use]
extern crate lazy_static;

pub mod error;
pub mod executor;
pub mod expr;
pub mod normalize;
pub mod operator;
pub mod plan;
pub mod properties;
pub mod rules;
pub mod tree;

#[cfg(test)]
mod test_utils;
