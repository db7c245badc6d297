//! Library: the `{"items": [...], "collections": [...]}` interchange document.
//!
//! The same shape is produced by `bibtags snapshot`, read by the dump source,
//! and written by the JSON cache.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Collection, Item};
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

impl Library {
    pub fn new(items: Vec<Item>, collections: Vec<Collection>) -> Self {
        Self { items, collections }
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a library dump from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Write as indented JSON.
    pub fn write_pretty(&self, writer: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_pretty(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Name of the owning library, taken from the first item that carries one.
    pub fn name(&self) -> Option<&str> {
        self.items
            .iter()
            .filter_map(|item| item.library.as_ref())
            .map(|lib| lib.name.as_str())
            .find(|name| !name.is_empty())
    }

    /// Child notes of `parent_key`, in library order.
    pub fn notes_for<'a>(&'a self, parent_key: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |item| {
            item.is_note() && item.data.parent_item.as_deref() == Some(parent_key)
        })
    }
}
