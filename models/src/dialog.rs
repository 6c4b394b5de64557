//! Payloads of the dialog channel.
//!
//! The dialog channel forwards a whole multi-method capability through a single serving
//! method ([`crate::DIALOG_FUNCTION`]); [`DialogMethod`] is the set of names it accepts.

use crate::error::model_error::ModelError;

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogMethod {
    ShowMessageBox,
    ShowOpenDialog,
    ShowSaveDialog,
    ShowErrorBox,
}

impl DialogMethod {
    pub const ALL: [DialogMethod; 4] = [
        DialogMethod::ShowMessageBox,
        DialogMethod::ShowOpenDialog,
        DialogMethod::ShowSaveDialog,
        DialogMethod::ShowErrorBox,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            DialogMethod::ShowMessageBox => "showMessageBox",
            DialogMethod::ShowOpenDialog => "showOpenDialog",
            DialogMethod::ShowSaveDialog => "showSaveDialog",
            DialogMethod::ShowErrorBox => "showErrorBox",
        }
    }

    /// # Errors
    ///
    /// Returns [`ModelError::UnknownDialogMethod`] for names outside [`DialogMethod::ALL`].
    #[track_caller]
    pub fn parse(name: &str) -> Result<Self, ModelError> {
        DialogMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == name)
            .ok_or_else(|| ModelError::UnknownDialogMethod {
                message: format!("illegal dialog method '{name}'"),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl Display for DialogMethod {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBoxOptions {
    pub message: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default)]
    pub buttons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_id: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBoxReturnValue {
    /// Index of the clicked button.
    pub response: u32,
    #[serde(default)]
    pub checkbox_checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDialogOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_label: Option<String>,
    #[serde(default)]
    pub filters: Vec<FileFilter>,
    /// `openFile`, `openDirectory`, `multiSelections`, …
    #[serde(default)]
    pub properties: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDialogReturnValue {
    pub canceled: bool,
    #[serde(default)]
    pub file_paths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDialogOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_label: Option<String>,
    #[serde(default)]
    pub filters: Vec<FileFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDialogReturnValue {
    pub canceled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}
