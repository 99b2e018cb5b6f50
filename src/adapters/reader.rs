use crate::domain::model::{InputMode, MalformedPolicy};
use crate::utils::error::{EtlError, Result};
use serde_json::Value;
use std::io::BufRead;

enum Values<'a> {
    Stream(Box<dyn Iterator<Item = serde_json::Result<Value>> + 'a>),
    Lines(Box<dyn BufRead + 'a>),
}

/// Iterates the JSON values of one traversal. Stops after the first error.
pub struct RecordReader<'a> {
    values: Values<'a>,
    policy: MalformedPolicy,
    position: usize,
    skipped: usize,
    line: Vec<u8>,
    done: bool,
}

impl<'a> RecordReader<'a> {
    pub fn new(reader: Box<dyn BufRead + 'a>, mode: InputMode, policy: MalformedPolicy) -> Self {
        let values = match mode {
            InputMode::Stream => Values::Stream(Box::new(
                serde_json::Deserializer::from_reader(reader).into_iter::<Value>(),
            )),
            InputMode::Lines => Values::Lines(reader),
        };

        Self {
            values,
            policy,
            position: 0,
            skipped: 0,
            line: Vec::new(),
            done: false,
        }
    }

    /// Malformed lines skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn fail(&mut self, error: EtlError) -> Option<Result<Value>> {
        self.done = true;
        Some(Err(error))
    }

    fn next_from_stream(&mut self) -> Option<Result<Value>> {
        let Values::Stream(values) = &mut self.values else {
            return None;
        };

        match values.next()? {
            Ok(value) => {
                self.position += 1;
                Some(Ok(value))
            }
            Err(e) if e.is_io() => self.fail(EtlError::IoError(e.into())),
            Err(source) => {
                let record = self.position + 1;
                self.fail(EtlError::MalformedInputError { record, source })
            }
        }
    }

    // 以位元組讀取，非 UTF-8 的行也算格式錯誤
    fn next_from_lines(&mut self) -> Option<Result<Value>> {
        loop {
            let Values::Lines(reader) = &mut self.values else {
                return None;
            };

            self.line.clear();
            match reader.read_until(b'\n', &mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return self.fail(EtlError::IoError(e)),
            }
            self.position += 1;

            if self.line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match serde_json::from_slice::<Value>(&self.line) {
                Ok(value) => return Some(Ok(value)),
                Err(source) if self.policy == MalformedPolicy::Skip => {
                    tracing::warn!("⚠️ Skipping malformed line {}: {}", self.position, source);
                    self.skipped += 1;
                }
                Err(source) => {
                    let record = self.position;
                    return self.fail(EtlError::MalformedInputError { record, source });
                }
            }
        }
    }
}

impl Iterator for RecordReader<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.values {
            Values::Stream(_) => self.next_from_stream(),
            Values::Lines(_) => self.next_from_lines(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(input: &'static str, mode: InputMode, policy: MalformedPolicy) -> Vec<Result<Value>> {
        RecordReader::new(Box::new(input.as_bytes()), mode, policy).collect()
    }

    #[test]
    fn test_stream_reads_lines_and_concatenated_values() {
        let input = "{\"id\":\"1\"}\n{\"id\":\"2\"}{\"id\":\"3\"}\n[{\"id\":\"4\"}]";
        let values = read(input, InputMode::Stream, MalformedPolicy::Abort);

        assert_eq!(values.len(), 4);
        assert!(values.iter().all(|v| v.is_ok()));
    }

    #[test]
    fn test_stream_stops_at_malformed_value() {
        let values = read("{\"id\":\"1\"}\n{oops}\n{\"id\":\"3\"}", InputMode::Stream, MalformedPolicy::Abort);

        assert_eq!(values.len(), 2);
        assert!(values[0].is_ok());
        assert!(matches!(
            values[1],
            Err(EtlError::MalformedInputError { record: 2, .. })
        ));
    }

    #[test]
    fn test_lines_ignore_blank_lines() {
        let values = read("{\"id\":\"1\"}\n\n   \n{\"id\":\"2\"}\n", InputMode::Lines, MalformedPolicy::Abort);

        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_lines_abort_reports_line_number() {
        let values = read("{\"id\":\"1\"}\n\nnot json\n{\"id\":\"2\"}", InputMode::Lines, MalformedPolicy::Abort);

        assert_eq!(values.len(), 2);
        assert!(matches!(
            values[1],
            Err(EtlError::MalformedInputError { record: 3, .. })
        ));
    }

    #[test]
    fn test_lines_skip_counts_skipped() {
        let mut reader = RecordReader::new(
            Box::new("{\"id\":\"1\"}\nnot json\n{\"id\":\"2\"}\n".as_bytes()),
            InputMode::Lines,
            MalformedPolicy::Skip,
        );
        let values: Vec<Value> = reader.by_ref().map(|v| v.unwrap()).collect();

        assert_eq!(values.len(), 2);
        assert_eq!(reader.skipped(), 1);
    }

    const INVALID_UTF8: &[u8] = b"{\"id\":\"1\"}\n{\"id\":\"\xff\"}\n{\"id\":\"3\"}\n";

    #[test]
    fn test_lines_invalid_utf8_is_malformed() {
        let values: Vec<Result<Value>> =
            RecordReader::new(Box::new(INVALID_UTF8), InputMode::Lines, MalformedPolicy::Abort).collect();

        assert_eq!(values.len(), 2);
        assert!(matches!(
            values[1],
            Err(EtlError::MalformedInputError { record: 2, .. })
        ));
    }

    #[test]
    fn test_lines_skip_invalid_utf8() {
        let mut reader = RecordReader::new(Box::new(INVALID_UTF8), InputMode::Lines, MalformedPolicy::Skip);
        let values: Vec<Value> = reader.by_ref().map(|v| v.unwrap()).collect();

        assert_eq!(values, vec![serde_json::json!({"id": "1"}), serde_json::json!({"id": "3"})]);
        assert_eq!(reader.skipped(), 1);
    }

    #[test]
    fn test_lines_last_line_without_newline() {
        let values = read("{\"id\":\"1\"}\r\n{\"id\":\"2\"}", InputMode::Lines, MalformedPolicy::Abort);

        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v.is_ok()));
    }
}
