/*!

Export and import the character appearance stored in Hogwarts Legacy save
files.

A save file is a GVAS container with an SQLite database embedded in it as a
length-prefixed byte array. hlse finds that database, lets it be queried and
edited like any other SQLite file, and splices the result back into the
container while leaving every unrelated byte untouched.

## Quick Start

```no_run
use hlse::ImportOptions;

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let save = std::fs::read("HL-00-00.sav")?;

// Read the appearance of the player character
let mut appearance = hlse::export(&save)?;
appearance.first_name = String::from("Ada");

// And write it back
let edited = hlse::import(&save, &appearance, ImportOptions::new())?;
std::fs::write("HL-00-00.sav", edited)?;
# Ok(())
# }
```

## One Level Lower

The container can be edited without going through the store at all. Any
replacement blob is accepted; both size fields are rewritten to match it.

```
use hlse::{SaveFile, MAGIC, MARKER};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let mut data = MAGIC.to_vec();
data.extend_from_slice(MARKER);
data.extend_from_slice(&[0; 19]);
data.extend_from_slice(&9u32.to_le_bytes());
data.extend_from_slice(&[0; 22]);
data.extend_from_slice(&5u32.to_le_bytes());
data.extend_from_slice(b"HELLO");
data.extend_from_slice(b"END");

let save = SaveFile::from_slice(&data)?;
assert_eq!(save.blob(), b"HELLO");

let edited = save.reassemble(b"HI")?;
assert_eq!(edited.len(), data.len() - 3);
assert!(edited.ends_with(b"HIEND"));
# Ok(())
# }
```

*/

pub mod appearance;
pub mod container;
mod errors;
mod scan;
mod session;
mod staging;
pub mod store;

pub use self::appearance::{Appearance, AppearancePreset, GenderEntry, ImportOptions};
pub use self::container::{check_magic, reassemble, HeaderOffsets, SaveFile, MAGIC, MARKER};
pub use self::errors::*;
pub use self::scan::{find_first, locate};
pub use self::session::{edit, export, import, inspect};
pub use self::staging::StagingFile;
pub use self::store::{CharacterStore, NameField};
