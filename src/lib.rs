//! Tickmake core library.
//!
//! Tickmake reads an ordered set of Make-style rules, turns them into a
//! dependency graph, synthesises concrete rules from `%` pattern rules,
//! substitutes `@TARGET`, `@DEPENDENCIES` and `@DEP[i]` in recipes, and
//! simulates one incremental build pass against logical timestamps. Recipes
//! are never executed; the pass yields a [`scheduler::BuildTrace`].
//!
//! The stages are free functions over a shared [`graph::Graph`] and are
//! driven in order by [`pipeline::BuildContext`].

pub mod ast;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod interpolate;
pub mod pattern;
pub mod pipeline;
pub mod runner;
pub mod scheduler;
pub mod timestamps;
