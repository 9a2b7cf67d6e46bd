//! Feature / task selection
//!
//! The selection decides whether a message may be sent at all and which
//! shape the backend request takes.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level conversation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "Test Case Generator")]
    TestCaseGenerator,
    #[serde(rename = "Selenium Script Generator")]
    SeleniumScriptGenerator,
}

impl Feature {
    pub const ALL: [Feature; 2] = [Feature::TestCaseGenerator, Feature::SeleniumScriptGenerator];

    pub fn display_name(self) -> &'static str {
        match self {
            Feature::TestCaseGenerator => "Test Case Generator",
            Feature::SeleniumScriptGenerator => "Selenium Script Generator",
        }
    }

    /// Backend-facing agent identifier
    pub fn agent_type(self) -> &'static str {
        match self {
            Feature::TestCaseGenerator => "test_generator",
            Feature::SeleniumScriptGenerator => "selenium_generator",
        }
    }

    /// Both generators reply with source text (Gherkin or a script)
    pub fn renders_code(self) -> bool {
        match self {
            Feature::TestCaseGenerator | Feature::SeleniumScriptGenerator => true,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Feature-scoped sub-option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Task {
    /// Target scripting language for the Selenium generator
    Language(String),
}

impl Task {
    pub fn language(name: impl Into<String>) -> Self {
        Task::Language(name.into())
    }

    pub fn parent(&self) -> Feature {
        match self {
            Task::Language(_) => Feature::SeleniumScriptGenerator,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Task::Language(lang) => lang,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Task '{task}' does not belong to feature '{feature}'")]
    TaskFeatureMismatch { feature: Feature, task: String },
}

/// Current feature/task pair. Both may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a new selection.
    ///
    /// A feature without a task clears the task; a task alone implies its
    /// parent feature. On error the selection is left untouched.
    pub fn select(
        &mut self,
        feature: Option<Feature>,
        task: Option<Task>,
    ) -> Result<(), SelectionError> {
        let feature = match (feature, &task) {
            (Some(feature), Some(task)) if task.parent() != feature => {
                return Err(SelectionError::TaskFeatureMismatch {
                    feature,
                    task: task.as_str().to_string(),
                });
            }
            (None, Some(task)) => Some(task.parent()),
            (feature, _) => feature,
        };

        self.feature = feature;
        self.task = task;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.feature = None;
        self.task = None;
    }
}
