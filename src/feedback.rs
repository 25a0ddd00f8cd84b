// Launcher feedback items.
// Builds the Alfred Script Filter document written to stdout.

use std::io::Write;

use serde::Serialize;

use crate::error::{GhelperError, Result};

/// One row shown by the launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub title: String,
    pub subtitle: String,
    /// Value passed to the next workflow action when the row is actioned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    /// Stable identifier the launcher uses to learn result ordering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub valid: bool,
}

impl Item {
    /// An informational row: no argument, not actionable.
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            arg: None,
            uid: None,
            valid: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arg = Some(arg.into());
        self
    }

    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }
}

/// Items collected during one invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Feedback {
    items: Vec<Item>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Write the document followed by a newline.
    pub fn write_to(&self, mut writer: impl Write) -> Result<()> {
        serde_json::to_writer(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl FromIterator<Item> for Feedback {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Plain-text rendering of a failed invocation, shown by the launcher as-is.
/// Response bodies can span lines, so line breaks are folded into spaces.
pub fn render_error(err: &GhelperError) -> String {
    let message = err.to_string().lines().map(str::trim).collect::<Vec<_>>().join(" ");
    format!("Error: {}", message)
}
