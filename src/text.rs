//! Bracketed text format
//!
//! Grammar: `tree := node ('(' tree ('|' tree)* ')')?`, where `node` is the
//! `role:pos:word` shorthand. Example: `S(Head:Nab:中文字|particle:Td:耶)`.
//!
//! The parser is a single left-to-right character scan with a stack of open
//! parent ids. The writer is its exact inverse for well-formed input.

use crate::error::TreeError;
use crate::node::{NodeData, NodeId};
use crate::tree::Tree;
use memchr::memmem;
use serde::{Deserialize, Serialize};

pub const OPEN: char = '(';
pub const CLOSE: char = ')';
pub const SIBLING_SEPARATOR: char = '|';

/// Options for reading bracketed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Apply [`normalize_text`] before scanning
    pub normalize: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self { normalize: true }
    }
}

/// Strip the enumeration prefix and trailing `#` some upstream text carries
///
/// Only applies when the text contains a `#`: everything up to and including
/// the first `"] "` is dropped, then trailing `#`s are removed.
/// `"[3] S(Head:Na:x)#"` becomes `"S(Head:Na:x)"`.
pub fn normalize_text(text: &str) -> &str {
    if memchr::memchr(b'#', text.as_bytes()).is_none() {
        return text;
    }

    let body = match memmem::find(text.as_bytes(), b"] ") {
        Some(pos) => &text[pos + 2..],
        None => text,
    };
    body.trim_end_matches('#')
}

/// Scanner state for one parse
struct TextParser {
    tree: Tree,
    /// Open parents; the bottom entry is the root sentinel
    stack: Vec<Option<NodeId>>,
    next_id: NodeId,
    text: String,
    /// Set right after `)` or `|` so no empty node is flushed there
    ending: bool,
}

impl TextParser {
    fn new() -> Self {
        Self {
            tree: Tree::new(),
            stack: vec![None],
            next_id: 0,
            text: String::new(),
            ending: true,
        }
    }

    fn parent(&self) -> Option<NodeId> {
        self.stack.last().copied().flatten()
    }

    /// Turn the buffer into a node under the current parent
    fn flush(&mut self) -> Result<NodeId, TreeError> {
        let text = std::mem::take(&mut self.text);
        let data = NodeData::from_text(&text)?;
        let id = self.next_id;
        let parent = self.parent();

        tracing::trace!(id, ?parent, tag = %text, "create node");
        self.tree.create_node(id, parent, text, data)?;
        self.next_id += 1;
        Ok(id)
    }

    fn parse(mut self, input: &str) -> Result<Tree, TreeError> {
        for (offset, c) in input.chars().enumerate() {
            match c {
                OPEN => {
                    let id = self.flush()?;
                    self.stack.push(Some(id));
                    self.ending = false;
                }
                CLOSE => {
                    if self.stack.len() <= 1 {
                        return Err(TreeError::structural(offset, "unbalanced ')'"));
                    }
                    if !self.ending {
                        self.flush()?;
                    }
                    self.stack.pop();
                    self.text.clear();
                    self.ending = true;
                }
                SIBLING_SEPARATOR => {
                    if self.stack.len() <= 1 {
                        return Err(TreeError::structural(
                            offset,
                            "'|' outside of brackets",
                        ));
                    }
                    if !self.ending {
                        self.flush()?;
                    }
                    self.text.clear();
                    self.ending = true;
                }
                _ => {
                    self.ending = false;
                    self.text.push(c);
                }
            }
        }

        let end = input.chars().count();
        if self.stack.len() > 1 {
            return Err(TreeError::structural(end, "unclosed '('"));
        }
        if !self.text.is_empty() {
            // A bare node with no brackets is a one-node tree
            if !self.tree.is_empty() {
                return Err(TreeError::structural(end, "text after end of tree"));
            }
            self.flush()?;
        }

        tracing::debug!(nodes = self.tree.len(), "parsed tree text");
        Ok(self.tree)
    }
}

impl Tree {
    /// Parse bracketed text with default options (normalization on)
    pub fn from_text(text: &str) -> Result<Self, TreeError> {
        Self::from_text_with(text, TextOptions::default())
    }

    /// Parse bracketed text
    ///
    /// Node ids are issued from 0 in the order nodes are read. A failed parse
    /// returns the error only; no partial tree is handed back.
    pub fn from_text_with(text: &str, options: TextOptions) -> Result<Self, TreeError> {
        let text = if options.normalize {
            normalize_text(text)
        } else {
            text
        };
        TextParser::new().parse(text)
    }

    /// Bracketed text of the whole tree; empty for an empty tree
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root_id() {
            self.write_text(root, &mut out);
        }
        out
    }

    /// Bracketed text of the subtree under `id`
    pub fn to_text_at(&self, id: NodeId) -> Result<String, TreeError> {
        if !self.contains(id) {
            return Err(TreeError::MissingNode(id));
        }
        let mut out = String::new();
        self.write_text(id, &mut out);
        Ok(out)
    }

    fn write_text(&self, id: NodeId, out: &mut String) {
        let mut stack = vec![Token::Node(id)];
        while let Some(token) = stack.pop() {
            let node = match token {
                Token::Separator => {
                    out.push(SIBLING_SEPARATOR);
                    continue;
                }
                Token::Close => {
                    out.push(CLOSE);
                    continue;
                }
                Token::Node(id) => match self.get(id) {
                    Some(node) => node,
                    None => continue,
                },
            };

            out.push_str(&node.data.to_text());
            if node.is_leaf() {
                continue;
            }

            out.push(OPEN);
            stack.push(Token::Close);
            for (i, &child) in node.children_ids().iter().enumerate().rev() {
                stack.push(Token::Node(child));
                if i > 0 {
                    stack.push(Token::Separator);
                }
            }
        }
    }
}

/// Pending output of the text writer, next on top of the stack
enum Token {
    Node(NodeId),
    Separator,
    Close,
}
