use crate::{
    appearance::{Appearance, ImportOptions},
    container::SaveFile,
    staging::StagingFile,
    store::CharacterStore,
    Error,
};
use log::{debug, info};

/// Runs `f` against the database embedded in `data` and returns its result
/// along with the reassembled container.
///
/// The container is only rebuilt after the store is closed and the complete
/// database has been read back. The staging file is removed before this
/// function returns, on success and on failure.
pub fn edit<T, F>(data: &[u8], f: F) -> Result<(T, Vec<u8>), Error>
where
    F: FnOnce(&CharacterStore) -> Result<T, Error>,
{
    let save = SaveFile::from_slice(data)?;
    let staging = StagingFile::create(save.blob())?;

    let store = CharacterStore::open(staging.path())?;
    let value = f(&store)?;
    store.close()?;

    let blob = staging.read_back()?;
    staging.close()?;
    debug!(
        "database image resized from {} to {} bytes",
        save.offsets().blob_len(),
        blob.len()
    );

    let out = save.reassemble(&blob)?;
    Ok((value, out))
}

/// Reads the database embedded in `data` without building a new container
pub fn inspect<T, F>(data: &[u8], f: F) -> Result<T, Error>
where
    F: FnOnce(&CharacterStore) -> Result<T, Error>,
{
    let save = SaveFile::from_slice(data)?;
    let staging = StagingFile::create(save.blob())?;
    let store = CharacterStore::open(staging.path())?;
    let value = f(&store)?;
    store.close()?;
    staging.close()?;
    Ok(value)
}

/// Extracts the character appearance from a save file
pub fn export(data: &[u8]) -> Result<Appearance, Error> {
    let appearance = inspect(data, Appearance::from_store)?;
    info!(
        "exported {} {} ({} presets, {} gender entries)",
        appearance.first_name,
        appearance.last_name,
        appearance.appearance_data.len(),
        appearance.gender_data.len()
    );
    Ok(appearance)
}

/// Returns a copy of the save file with `appearance` applied
pub fn import(data: &[u8], appearance: &Appearance, options: ImportOptions) -> Result<Vec<u8>, Error> {
    let ((), out) = edit(data, |store| appearance.apply(store, options))?;
    info!(
        "imported {} presets and {} gender entries{}",
        appearance.appearance_data.len(),
        appearance.gender_data.len(),
        if options.keep_names() {
            ", keeping the original name"
        } else {
            ""
        }
    );
    Ok(out)
}
