//! JSON export of every range in a database.
//!
//! Output shape:
//!
//! ```text
//! {"address":[{"address_first":0,"address_last":16777215,"country":"..","area":".."}, ...],"total":N}
//! ```

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::database::{Database, Ranges};
use crate::Result;

/// Serializes a full dump while pulling ranges lazily from the index.
struct Dump<'a, S> {
    db: &'a Database<S>,
}

/// Adapter that lets `collect_seq` drive the range iterator.
struct RangeSeq<'a, S>(RefCell<Option<Ranges<'a, S>>>);

impl<S: AsRef<[u8]>> Serialize for RangeSeq<'_, S> {
    fn serialize<Ser: Serializer>(
        &self,
        serializer: Ser,
    ) -> std::result::Result<Ser::Ok, Ser::Error> {
        match self.0.borrow_mut().take() {
            Some(ranges) => serializer.collect_seq(ranges),
            None => serializer.collect_seq(std::iter::empty::<()>()),
        }
    }
}

impl<S: AsRef<[u8]>> Serialize for Dump<'_, S> {
    fn serialize<Ser: Serializer>(
        &self,
        serializer: Ser,
    ) -> std::result::Result<Ser::Ok, Ser::Error> {
        let mut state = serializer.serialize_struct("Dump", 2)?;
        let ranges = RangeSeq(RefCell::new(Some(self.db.enumerate_all())));
        state.serialize_field("address", &ranges)?;
        state.serialize_field("total", &self.db.total())?;
        state.end()
    }
}

/// Stream every range of `db` as JSON into `writer`.
pub fn write_json<S: AsRef<[u8]>, W: Write>(db: &Database<S>, writer: W) -> Result<()> {
    serde_json::to_writer(writer, &Dump { db })?;
    Ok(())
}

/// Write every range of `db` as JSON to the file at `path`.
pub fn dump_json<S: AsRef<[u8]>>(db: &Database<S>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(db, &mut writer)?;
    writer.flush()?;
    log::info!("Exported {} ranges to {:?}", db.total(), path);
    Ok(())
}
