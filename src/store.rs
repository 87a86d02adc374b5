//! Row level access to the character data inside the database image

use crate::{
    appearance::{AppearancePreset, GenderEntry},
    Error, ErrorKind,
};
use log::{debug, trace};
use rusqlite::{params, types::ValueRef, Connection, OpenFlags};
use std::path::Path;

const REGISTRY_ID: &str = "Player0";

const SELECT_NAME: &str = r#"SELECT "DataValue" FROM "MiscDataDynamic" WHERE "DataName" = ?1"#;
const UPDATE_NAME: &str = r#"UPDATE "MiscDataDynamic" SET "DataValue" = ?1 WHERE "DataName" = ?2"#;
const SELECT_PRESETS: &str = r#"SELECT "PresetType", "PresetName" FROM "AvatarFullBodyPresetsDynamic" WHERE "RegistryId" = ?1"#;
const DELETE_PRESETS: &str = r#"DELETE FROM "AvatarFullBodyPresetsDynamic" WHERE "RegistryId" = ?1"#;
const INSERT_PRESET: &str = r#"INSERT INTO "AvatarFullBodyPresetsDynamic" ("RegistryId", "PresetType", "PresetName") VALUES (?1, ?2, ?3)"#;
const SELECT_GENDER: &str = r#"SELECT "DataName", "DataValue" FROM "MiscDataDynamic" WHERE "DataOwner" = 'Player' AND "DataName" IN ('GenderPronoun', 'GenderVoice', 'GenderRig')"#;
const UPDATE_GENDER: &str = r#"UPDATE "MiscDataDynamic" SET "DataValue" = ?1 WHERE "DataOwner" = 'Player' AND "DataName" = ?2"#;

/// One of the two name rows of the player character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    First,
    Last,
}

impl NameField {
    /// The `DataName` key of the row
    pub fn data_name(&self) -> &'static str {
        match self {
            NameField::First => "PlayerFirstName",
            NameField::Last => "PlayerLastName",
        }
    }
}

/// An open session against a staged database image
#[derive(Debug)]
pub struct CharacterStore {
    conn: Connection,
}

impl CharacterStore {
    /// Opens an existing database file for reading and writing
    pub fn open(path: &Path) -> Result<Self, Error> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(CharacterStore { conn })
    }

    /// Wraps an already open connection
    pub fn from_connection(conn: Connection) -> Self {
        CharacterStore { conn }
    }

    /// The underlying connection, for statements not covered here
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Runs `f` inside a transaction that is committed only if it succeeds
    pub fn in_transaction<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Self) -> Result<T, Error>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    /// Reads one of the character's names
    pub fn name(&self, field: NameField) -> Result<String, Error> {
        let value = self
            .conn
            .query_row(SELECT_NAME, params![field.data_name()], |row| {
                Ok(text(row.get_ref(0)?))
            })?;
        Ok(value)
    }

    /// Overwrites one of the character's names
    pub fn set_name(&self, field: NameField, value: &str) -> Result<(), Error> {
        self.update("names_updt", UPDATE_NAME, params![value, field.data_name()])
    }

    /// Full body presets of the player character, in storage order
    pub fn presets(&self) -> Result<Vec<AppearancePreset>, Error> {
        let mut stmt = self.conn.prepare(SELECT_PRESETS)?;
        let rows = stmt.query_map(params![REGISTRY_ID], |row| {
            Ok(AppearancePreset {
                preset_type: text(row.get_ref(0)?),
                preset_name: text(row.get_ref(1)?),
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Deletes every preset of the player character and inserts `presets`
    pub fn replace_presets(&self, presets: &[AppearancePreset]) -> Result<(), Error> {
        self.update("appearance_data_del", DELETE_PRESETS, params![REGISTRY_ID])?;
        for preset in presets {
            self.update(
                "appearance_data_ins",
                INSERT_PRESET,
                params![REGISTRY_ID, preset.preset_type, preset.preset_name],
            )?;
        }
        Ok(())
    }

    /// Gender related entries of the player character, in storage order
    pub fn gender(&self) -> Result<Vec<GenderEntry>, Error> {
        let mut stmt = self.conn.prepare(SELECT_GENDER)?;
        let rows = stmt.query_map([], |row| {
            Ok(GenderEntry {
                data_name: text(row.get_ref(0)?),
                data_value: text(row.get_ref(1)?),
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Overwrites the value of a gender entry
    pub fn set_gender(&self, entry: &GenderEntry) -> Result<(), Error> {
        self.update(
            "gender_data_updt",
            UPDATE_GENDER,
            params![entry.data_value, entry.data_name],
        )
    }

    /// Closes the connection so the staged file is complete on disk
    pub fn close(self) -> Result<(), Error> {
        self.conn.close().map_err(|(_, err)| Error::from(err))
    }

    fn update(
        &self,
        statement: &'static str,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<(), Error> {
        let affected = self.conn.execute(sql, params)?;
        trace!("{}: {} rows affected", statement, affected);
        if affected == 0 {
            debug!("{} did not modify any rows", statement);
            return Err(ErrorKind::RowNotUpdated { statement }.into());
        }
        Ok(())
    }
}

/// Renders a column as text, the way the game's values are exported
fn text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(x) => x.to_string(),
        ValueRef::Real(x) => x.to_string(),
        ValueRef::Text(x) | ValueRef::Blob(x) => String::from_utf8_lossy(x).into_owned(),
    }
}
