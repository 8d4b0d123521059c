// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history for document commands.
//!
//! Mutations that should be reversible are submitted as
//! [`DocumentCommand`]s; the history executes them and keeps them for undo.

use crate::commands::DocumentCommand;
use crate::document::Document;
use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum undo history depth
const MAX_HISTORY: usize = 100;

/// Serialized copy of some document state, kept for undo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Serialized state
    pub data: Vec<u8>,
}

impl StateSnapshot {
    /// Create from serializable value
    pub fn from_value<T: Serialize>(value: &T) -> Result<Self> {
        let data = bincode::serialize(value)?;
        Ok(Self { data })
    }

    /// Deserialize to value
    pub fn to_value<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        Ok(bincode::deserialize(&self.data)?)
    }
}

/// History statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Commands in the undo stack
    pub undo_count: usize,
    /// Commands in the redo stack
    pub redo_count: usize,
    /// Maximum history depth
    pub max_depth: usize,
}

/// Undo/redo history manager
pub struct History {
    undo_stack: VecDeque<Box<dyn DocumentCommand>>,
    redo_stack: VecDeque<Box<dyn DocumentCommand>>,
    max_depth: usize,
}

impl History {
    /// Create a new history manager
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth,
        }
    }

    /// Execute a command and record it for undo
    pub fn insert(
        &mut self,
        mut command: Box<dyn DocumentCommand>,
        document: &mut Document,
    ) -> Result<()> {
        command.execute(document)?;
        tracing::info!("{}", command.description());

        self.redo_stack.clear();
        self.undo_stack.push_back(command);

        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }

        Ok(())
    }

    /// Undo the last command, returning its description
    pub fn undo(&mut self, document: &mut Document) -> Result<String> {
        let mut command = self.undo_stack.pop_back().ok_or(ModelError::NothingToUndo)?;

        if let Err(err) = command.undo(document) {
            self.undo_stack.push_back(command);
            return Err(err);
        }

        let description = command.description().to_string();
        self.redo_stack.push_back(command);
        Ok(description)
    }

    /// Redo the last undone command, returning its description
    pub fn redo(&mut self, document: &mut Document) -> Result<String> {
        let mut command = self.redo_stack.pop_back().ok_or(ModelError::NothingToRedo)?;

        if let Err(err) = command.execute(document) {
            self.redo_stack.push_back(command);
            return Err(err);
        }

        let description = command.description().to_string();
        self.undo_stack.push_back(command);
        Ok(description)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.undo_stack.len(),
            redo_count: self.redo_stack.len(),
            max_depth: self.max_depth,
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
