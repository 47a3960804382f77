//! List
//!
//! Human-readable dump of the header and valid slots, or a JSON array of
//! the valid identifiers.

use std::fmt::Write;

use serde::Serialize;

use crate::error::{ImgStoreError, Result};

use super::ImgStore;

/// Output format for [`ImgStore::list`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Header followed by every valid slot's metadata
    Text,
    /// `{"Images": [ids...]}`
    Json,
}

#[derive(Serialize)]
struct ImageList<'a> {
    #[serde(rename = "Images")]
    images: Vec<&'a str>,
}

impl ImgStore {
    /// Describe the store content
    pub fn list(&self, mode: ListMode) -> Result<String> {
        match mode {
            ListMode::Text => Ok(self.list_text()),
            ListMode::Json => {
                let list = ImageList {
                    images: self
                        .metadata
                        .iter()
                        .filter(|slot| slot.is_valid())
                        .map(|slot| slot.img_id.as_str())
                        .collect(),
                };
                serde_json::to_string(&list).map_err(|e| ImgStoreError::Io(e.into()))
            }
        }
    }

    fn list_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(out, "{}", self.header);

        if self.header.num_files == 0 {
            out.push_str("<< empty imgStore >>\n");
            return out;
        }

        for slot in self.metadata.iter().filter(|slot| slot.is_valid()) {
            let _ = writeln!(out, "{}", slot);
        }
        out
    }
}
