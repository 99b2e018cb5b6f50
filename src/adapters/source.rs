use crate::core::RecordSource;
use crate::utils::error::{EtlError, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;

/// A file on disk, reopened for every traversal.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for FileSource {
    fn open(&self) -> Result<Box<dyn BufRead + '_>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn is_rewindable(&self) -> bool {
        true
    }
}

/// Fully buffered input, used when a non-seekable stream must be read twice.
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Vec<u8>,
    label: String,
}

impl MemorySource {
    pub fn new(data: impl Into<Vec<u8>>, label: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            label: label.into(),
        }
    }

    pub fn buffer<R: Read>(mut reader: R, label: impl Into<String>) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        tracing::debug!("Buffered {} bytes of input", data.len());
        Ok(Self::new(data, label))
    }
}

impl RecordSource for MemorySource {
    fn open(&self) -> Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(self.data.as_slice()))
    }

    fn describe(&self) -> String {
        self.label.clone()
    }

    fn is_rewindable(&self) -> bool {
        true
    }
}

/// A one-shot reader such as stdin. The second `open` fails.
pub struct StreamSource {
    reader: RefCell<Option<Box<dyn BufRead>>>,
    label: String,
}

impl StreamSource {
    pub fn new(reader: impl BufRead + 'static, label: impl Into<String>) -> Self {
        Self {
            reader: RefCell::new(Some(Box::new(reader))),
            label: label.into(),
        }
    }
}

impl RecordSource for StreamSource {
    fn open(&self) -> Result<Box<dyn BufRead + '_>> {
        match self.reader.borrow_mut().take() {
            Some(reader) => Ok(reader),
            None => Err(EtlError::ProcessingError {
                message: format!("{} cannot be rewound for a second pass", self.label),
            }),
        }
    }

    fn describe(&self) -> String {
        self.label.clone()
    }

    fn is_rewindable(&self) -> bool {
        false
    }
}

/// The input chosen at startup.
pub enum InputSource {
    File(FileSource),
    Memory(MemorySource),
    Stream(StreamSource),
}

impl RecordSource for InputSource {
    fn open(&self) -> Result<Box<dyn BufRead + '_>> {
        match self {
            InputSource::File(source) => source.open(),
            InputSource::Memory(source) => source.open(),
            InputSource::Stream(source) => source.open(),
        }
    }

    fn describe(&self) -> String {
        match self {
            InputSource::File(source) => source.describe(),
            InputSource::Memory(source) => source.describe(),
            InputSource::Stream(source) => source.describe(),
        }
    }

    fn is_rewindable(&self) -> bool {
        match self {
            InputSource::File(source) => source.is_rewindable(),
            InputSource::Memory(source) => source.is_rewindable(),
            InputSource::Stream(source) => source.is_rewindable(),
        }
    }
}
