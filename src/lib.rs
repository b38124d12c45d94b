// Licensed under MIT. See LICENSE for details.

//! Translates Dynamic Logic (DL) and Relational Dynamic Logic (RelDL)
//! programs into KeYmaeraX archives.

pub mod builder;
pub mod config;
pub mod error;
pub mod keymaerax;
pub mod lexer;
pub mod lowering;
pub mod parser;
pub mod pipeline;
pub mod state;
pub mod tree;
pub mod types;
pub mod visitor;

pub use crate::pipeline::{JobType, Pipeline};
pub use crate::types::{AstNode, Dialect};
