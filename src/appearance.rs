//! JSON projection of the player character's appearance
//!
//! ```
//! use hlse::Appearance;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = br#"{
//!     "firstName": "Hazel",
//!     "lastName": "Rowe",
//!     "appearanceData": [{ "presetType": "Hair", "presetName": "Hair_Braid_03" }],
//!     "genderData": [{ "dataName": "GenderRig", "dataValue": "Female" }]
//! }"#;
//!
//! let appearance = Appearance::from_slice(data)?;
//! assert_eq!(appearance.first_name, "Hazel");
//! assert_eq!(appearance.appearance_data[0].preset_name, "Hair_Braid_03");
//! # Ok(())
//! # }
//! ```

use crate::{
    store::{CharacterStore, NameField},
    Error,
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use std::io::{Read, Write};

/// A single full body preset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearancePreset {
    pub preset_type: String,
    pub preset_name: String,
}

/// A gender related key/value entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderEntry {
    pub data_name: String,
    pub data_value: String,
}

/// Everything that is exported from, and imported into, a save file
///
/// Lists that are absent or `null` are read as empty.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub appearance_data: Vec<AppearancePreset>,
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub gender_data: Vec<GenderEntry>,
}

/// Controls how an [`Appearance`] is written back into the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    keep_names: bool,
}

impl ImportOptions {
    /// Creates the default options: every field is imported
    pub fn new() -> Self {
        ImportOptions::default()
    }

    /// Leave the character's first and last name as they are in the save
    pub fn with_keep_names(mut self, keep_names: bool) -> Self {
        self.keep_names = keep_names;
        self
    }

    /// Returns whether names are left untouched
    pub fn keep_names(&self) -> bool {
        self.keep_names
    }
}

impl Appearance {
    /// Reads the appearance rows of the player character
    pub fn from_store(store: &CharacterStore) -> Result<Self, Error> {
        Ok(Appearance {
            first_name: store.name(NameField::First)?,
            last_name: store.name(NameField::Last)?,
            appearance_data: store.presets()?,
            gender_data: store.gender()?,
        })
    }

    /// Writes the appearance into the store within a single transaction
    ///
    /// Presets replace the existing presets wholesale. Gender entries update
    /// existing rows only; an entry without a matching row is an error.
    pub fn apply(&self, store: &CharacterStore, options: ImportOptions) -> Result<(), Error> {
        store.in_transaction(|store| {
            if !options.keep_names() {
                store.set_name(NameField::First, &self.first_name)?;
                store.set_name(NameField::Last, &self.last_name)?;
            }

            store.replace_presets(&self.appearance_data)?;
            for entry in &self.gender_data {
                store.set_gender(entry)?;
            }
            Ok(())
        })
    }

    /// Parses an appearance document
    pub fn from_slice(data: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Parses an appearance document from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Writes the document as tab indented JSON
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut ser)?;
        Ok(())
    }

    /// Returns the document as tab indented JSON
    pub fn to_vec_pretty(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        Ok(out)
    }
}
