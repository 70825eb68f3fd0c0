//! CSV archiving
//!
//! An [`Archiver`] writes serialisable records as rows of a CSV file inside
//! the session's archive directory, with a header row taken from the field
//! names of the first record.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::File;
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    ///
    /// Any existing file at the path is replaced.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Self::create(session.arch_root.join(path))
    }

    /// Create a new archiver writing to any path.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let w = WriterBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        Ok(Self {
            writer: Some(w)
        })
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(
        &mut self, record: T
    ) -> Result<(), Box<dyn std::error::Error>> {
        let w = self.writer_mut()?;
        w.serialize(record)?;
        w.flush()?;

        Ok(())
    }

    /// Serialise every record into the archive, flushing once at the end.
    pub fn serialise_all<T, I>(
        &mut self, records: I
    ) -> Result<usize, Box<dyn std::error::Error>>
    where
        T: Serialize,
        I: IntoIterator<Item = T>
    {
        let w = self.writer_mut()?;
        let mut num_records = 0;

        for record in records {
            w.serialize(record)?;
            num_records += 1;
        }
        w.flush()?;

        Ok(num_records)
    }

    fn writer_mut(&mut self) -> Result<&mut Writer<File>, Box<dyn std::error::Error>> {
        match self.writer {
            Some(ref mut w) => Ok(w),
            None => Err("Archiver has not been initialised".into())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        step: usize,
        value: f64,
    }

    #[test]
    fn test_archive() {
        let path = std::env::temp_dir()
            .join(format!("util_archive_test_{}", std::process::id()))
            .join("rows.csv");

        let mut arch = Archiver::create(&path).unwrap();
        arch.serialise(Row { step: 0, value: 0.5 }).unwrap();
        let n = arch
            .serialise_all((1..3).map(|step| Row { step, value: 1.0 }))
            .unwrap();
        assert_eq!(n, 2);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "step,value\n0,0.5\n1,1.0\n2,1.0\n");

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_uninitialised() {
        let mut arch = Archiver::default();

        assert!(arch.serialise(Row { step: 0, value: 0.0 }).is_err());
    }
}
