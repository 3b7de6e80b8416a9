//! Mock host serializer.

use std::sync::Arc;

use tagwire_codec::{WireReader, WireWriter};
use tagwire_runtime::{RuntimeResult, TagRuntime};

use crate::fixtures::TestRecord;

/// Stand-in for a host's record serializer.
///
/// Writes the base record (length-prefixed kind, then the sequence number)
/// and lets the runtime append the tag block, the way a real host calls the
/// serialization hooks.
#[derive(Debug, Clone, Copy)]
pub struct HostCodec<'a> {
    runtime: &'a TagRuntime<TestRecord>,
}

impl<'a> HostCodec<'a> {
    /// Wrap a runtime.
    #[must_use]
    pub fn new(runtime: &'a TagRuntime<TestRecord>) -> Self {
        Self { runtime }
    }

    /// Serialize one record and its tags.
    #[must_use]
    pub fn serialize(&self, record: &Arc<TestRecord>) -> Vec<u8> {
        let mut writer = WireWriter::new();
        self.write(record, &mut writer);
        writer.into_bytes()
    }

    /// Serialize several records back to back.
    #[must_use]
    pub fn serialize_all(&self, records: &[Arc<TestRecord>]) -> Vec<u8> {
        let mut writer = WireWriter::new();
        for record in records {
            self.write(record, &mut writer);
        }
        writer.into_bytes()
    }

    /// Deserialize exactly one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the base record is truncated, the tag block is
    /// rejected, or bytes are left over.
    pub fn deserialize(&self, bytes: &[u8]) -> RuntimeResult<Arc<TestRecord>> {
        let mut reader = WireReader::new(bytes);
        let record = self.read(&mut reader)?;
        reader.ensure_fully_consumed()?;
        Ok(record)
    }

    /// Deserialize records until the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the first error hit.
    pub fn deserialize_all(&self, bytes: &[u8]) -> RuntimeResult<Vec<Arc<TestRecord>>> {
        let mut reader = WireReader::new(bytes);
        let mut records = Vec::new();
        while !reader.is_exhausted() {
            records.push(self.read(&mut reader)?);
        }
        Ok(records)
    }

    fn write(self, record: &Arc<TestRecord>, writer: &mut WireWriter) {
        // Kinds over u32::MAX bytes go out empty.
        if writer.write_str(&record.kind).is_err() {
            writer.write_u32(0);
        }
        writer.write_u64(record.sequence);
        self.runtime.on_record_serialized(record, writer);
    }

    fn read(self, reader: &mut WireReader<'_>) -> RuntimeResult<Arc<TestRecord>> {
        let kind = String::from_utf8_lossy(reader.read_bytes()?).into_owned();
        let sequence = reader.read_u64()?;
        let record = Arc::new(TestRecord { kind, sequence });
        self.runtime.on_record_deserialized(record, reader)
    }
}
