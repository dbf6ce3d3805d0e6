//! Chunked streaming over the dataset
//!
//! The file is read in file order into chunks of `chunk_size` records. A
//! record that cannot be parsed marks its chunk as malformed; the remaining
//! records of that chunk are still consumed so later chunk boundaries do not
//! shift. I/O failures end the stream.

use std::fs::File;

use csv::StringRecord;

use super::errors::DatasetResult;
use super::handle::DatasetHandle;
use super::row::Row;
use super::value::{infer_column_type, parse_cell, ColumnType};

/// Contents of one chunk
#[derive(Debug)]
pub enum ChunkBody {
    Records(Vec<StringRecord>),
    Malformed { reason: String },
}

/// A contiguous slice of the file's data rows
#[derive(Debug)]
pub struct Chunk {
    /// Zero-based chunk number
    pub index: usize,
    /// File position of the first data row
    pub first_row: u64,
    pub body: ChunkBody,
}

/// A chunk with inferred column types and materialized rows
#[derive(Debug)]
pub struct TypedChunk {
    types: Vec<ColumnType>,
    rows: Vec<Row>,
}

impl TypedChunk {
    /// Infer column types across the chunk, then convert every cell
    ///
    /// Records shorter than `width` are padded with nulls.
    pub fn new(width: usize, first_row: u64, records: &[StringRecord]) -> Self {
        let types: Vec<ColumnType> = (0..width)
            .map(|col| infer_column_type(records.iter().map(|r| r.get(col).unwrap_or(""))))
            .collect();

        let rows = records
            .iter()
            .enumerate()
            .map(|(offset, record)| {
                let values = types
                    .iter()
                    .enumerate()
                    .map(|(col, ty)| parse_cell(record.get(col).unwrap_or(""), *ty))
                    .collect();
                Row::new(first_row + offset as u64, values)
            })
            .collect();

        Self { types, rows }
    }

    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

/// Iterator over the chunks of a dataset
pub struct ChunkReader {
    handle: DatasetHandle,
    reader: csv::Reader<File>,
    width: usize,
    next_chunk: usize,
    next_row: u64,
    done: bool,
}

impl ChunkReader {
    /// Open a fresh cursor over the dataset's data rows
    ///
    /// `width` is the schema's column count; wider records are malformed.
    pub fn open(handle: &DatasetHandle, width: usize) -> DatasetResult<Self> {
        let mut reader = handle.open_reader()?;
        // Consume the header so the first read_record yields data.
        reader
            .headers()
            .map_err(|e| handle.unreadable(format!("header row could not be parsed: {}", e)))?;

        Ok(Self {
            handle: handle.clone(),
            reader,
            width,
            next_chunk: 0,
            next_row: 0,
            done: false,
        })
    }

    fn read_chunk(&mut self) -> DatasetResult<Option<Chunk>> {
        let chunk_size = self.handle.chunk_size();
        let first_row = self.next_row;
        let mut records = Vec::with_capacity(chunk_size.min(4096));
        let mut malformed: Option<String> = None;
        let mut consumed = 0usize;

        while consumed < chunk_size {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    consumed += 1;
                    if record.len() > self.width && malformed.is_none() {
                        malformed = Some(format!(
                            "row {}: expected {} fields, found {}",
                            first_row + consumed as u64 - 1,
                            self.width,
                            record.len()
                        ));
                    }
                    if malformed.is_none() {
                        records.push(record);
                    }
                }
                Ok(false) => {
                    self.done = true;
                    break;
                }
                Err(e) if e.is_io_error() => {
                    self.done = true;
                    return Err(self
                        .handle
                        .unreadable(format!("read failed after row {}: {}", self.next_row, e)));
                }
                Err(e) => {
                    consumed += 1;
                    if malformed.is_none() {
                        malformed = Some(format!(
                            "row {}: {}",
                            first_row + consumed as u64 - 1,
                            e
                        ));
                    }
                }
            }
        }

        if consumed == 0 {
            return Ok(None);
        }

        let index = self.next_chunk;
        self.next_chunk += 1;
        self.next_row += consumed as u64;

        let body = match malformed {
            Some(reason) => ChunkBody::Malformed { reason },
            None => ChunkBody::Records(records),
        };

        Ok(Some(Chunk {
            index,
            first_row,
            body,
        }))
    }
}

impl Iterator for ChunkReader {
    type Item = DatasetResult<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.read_chunk().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn dataset(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    fn collect(handle: &DatasetHandle, width: usize) -> Vec<Chunk> {
        ChunkReader::open(handle, width)
            .unwrap()
            .map(|c| c.unwrap())
            .collect()
    }

    #[test]
    fn test_chunk_boundaries() {
        let file = dataset(b"n\n0\n1\n2\n3\n4\n");
        let handle = DatasetHandle::new(file.path(), ';', 2).unwrap();
        let chunks = collect(&handle, 1);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].first_row, 0);
        assert_eq!(chunks[1].first_row, 2);
        assert_eq!(chunks[2].first_row, 4);
        match &chunks[2].body {
            ChunkBody::Records(records) => assert_eq!(records.len(), 1),
            ChunkBody::Malformed { .. } => panic!("expected records"),
        }
    }

    #[test]
    fn test_header_only_yields_no_chunks() {
        let file = dataset(b"a;b\n");
        let handle = DatasetHandle::new(file.path(), ';', 10).unwrap();
        assert!(collect(&handle, 2).is_empty());
    }

    #[test]
    fn test_wide_record_marks_chunk_malformed() {
        let file = dataset(b"a;b\n1;2\n3;4;5\n6;7\n8;9\n");
        let handle = DatasetHandle::new(file.path(), ';', 2).unwrap();
        let chunks = collect(&handle, 2);

        assert_eq!(chunks.len(), 2);
        assert!(matches!(chunks[0].body, ChunkBody::Malformed { .. }));
        assert_eq!(chunks[1].first_row, 2);
        assert!(matches!(chunks[1].body, ChunkBody::Records(_)));
    }

    #[test]
    fn test_invalid_utf8_marks_chunk_malformed() {
        let file = dataset(b"a\nok\n\xff\xfe\nfine\n");
        let handle = DatasetHandle::new(file.path(), ';', 2).unwrap();
        let chunks = collect(&handle, 1);

        assert_eq!(chunks.len(), 2);
        assert!(matches!(chunks[0].body, ChunkBody::Malformed { .. }));
        assert!(matches!(chunks[1].body, ChunkBody::Records(_)));
    }

    #[test]
    fn test_typed_chunk_pads_short_records() {
        let records = vec![
            StringRecord::from(vec!["1", "x"]),
            StringRecord::from(vec!["2"]),
        ];
        let typed = TypedChunk::new(2, 10, &records);

        assert_eq!(typed.types(), [ColumnType::Integer, ColumnType::String]);
        assert_eq!(typed.rows()[1].position(), 11);
        assert!(typed.rows()[1].values()[1].is_null());
    }
}
