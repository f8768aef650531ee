//! Validation issues collected while transforming a generic document into the
//! typed tree. One structural pass gathers every issue it can find; callers
//! get the whole list, not just the first failure.

use std::error::Error;
use std::fmt;

/// A single structural problem, located by a `$.Object.Children[0]`-style path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Collector threaded through a validation pass.
#[derive(Debug, Default)]
pub struct Issues {
    items: Vec<Issue>,
}

impl Issues {
    pub fn push(&mut self, path: &str, message: impl Into<String>) {
        self.items.push(Issue {
            path: path.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.items.iter()
    }

    pub fn into_error(self) -> ValidationError {
        ValidationError {
            issues: self.items,
        }
    }
}

/// Aggregated validation failure for one decode pass.
#[derive(Debug)]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document validation failed ({} issue(s))", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "; {issue}")?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}
