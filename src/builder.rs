// Licensed under MIT. See LICENSE for details.

//! Grammar-arity-driven AST construction.
//!
//! The builder keeps a single stack of `AstNode`s. Entering a significant
//! rule pushes a labelled node; every terminal pushes a leaf; exiting a
//! significant rule pops as many nodes as the rule has direct parse-tree
//! children and hangs them, in order, below the node it pushed on entry.
//! Pass-through rules push nothing, which only balances when they have
//! exactly one direct child, so that is checked on every exit.

use crate::error::AstError;
use crate::tree::{ParseEvent, Rule};
use crate::types::AstNode;

/// Decides which rules become AST nodes.
pub trait RulePolicy {
    /// The node label for a significant rule, `None` for pass-through rules.
    fn label(&self, rule: Rule) -> Option<&'static str>;
}

#[derive(Debug)]
pub struct AstBuilder<P> {
    stack: Vec<AstNode>,
    policy: P,
}

impl<P: RulePolicy> AstBuilder<P> {
    pub fn new(policy: P) -> Self {
        AstBuilder {
            stack: vec![],
            policy,
        }
    }

    pub fn enter_rule(&mut self, rule: Rule) {
        if let Some(label) = self.policy.label(rule) {
            tracing::debug!("Entering rule {:?}, pushing '{}'", rule, label);
            self.stack.push(AstNode::new(label));
        }
    }

    pub fn visit_terminal(&mut self, text: &str) {
        tracing::debug!("Visiting terminal '{}'", text);
        self.stack.push(AstNode::new(text));
    }

    /// Pops the top `count` nodes, oldest first.
    pub fn pop_children(&mut self, rule: Rule, count: usize) -> Result<Vec<AstNode>, AstError> {
        let available = self.stack.len();
        if available < count {
            tracing::error!(
                "Stack underflow exiting {:?}: expected {} children, found {}",
                rule,
                count,
                available
            );
            return Err(AstError::StackUnderflow {
                rule,
                expected: count,
                available,
            });
        }
        Ok(self.stack.split_off(available - count))
    }

    /// Appends `children` to the node on top of the stack.
    pub fn attach(&mut self, rule: Rule, children: Vec<AstNode>) -> Result<(), AstError> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.add_children(children);
                Ok(())
            }
            None => {
                tracing::error!("Stack is empty when attaching children of {:?}", rule);
                Err(AstError::EmptyStack { rule })
            }
        }
    }

    pub fn exit_rule(&mut self, rule: Rule, child_count: usize) -> Result<(), AstError> {
        match self.policy.label(rule) {
            Some(_) => {
                let children = self.pop_children(rule, child_count)?;
                self.attach(rule, children)
            }
            None if child_count == 1 => Ok(()),
            None => Err(AstError::ArityMismatch {
                rule,
                children: child_count,
            }),
        }
    }

    pub fn feed(&mut self, event: ParseEvent) -> Result<(), AstError> {
        match event {
            ParseEvent::EnterRule(rule) => {
                self.enter_rule(rule);
                Ok(())
            }
            ParseEvent::ExitRule(rule, count) => self.exit_rule(rule, count),
            ParseEvent::VisitTerminal(text) => {
                self.visit_terminal(text);
                Ok(())
            }
        }
    }

    /// The node on top of the stack, i.e. the one a significant rule owns
    /// right after its exit.
    pub fn top_mut(&mut self) -> Option<&mut AstNode> {
        self.stack.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn finish(mut self) -> Option<AstNode> {
        match self.stack.len() {
            0 => None,
            1 => self.stack.pop(),
            n => {
                tracing::warn!(
                    "AST stack holds {} nodes after the walk, using the top one as root",
                    n
                );
                self.stack.pop()
            }
        }
    }
}

pub fn build_from_events<P: RulePolicy>(
    policy: P,
    events: &[ParseEvent],
) -> Result<Option<AstNode>, AstError> {
    let mut builder = AstBuilder::new(policy);
    for event in events {
        builder.feed(*event)?;
    }
    Ok(builder.finish())
}
