use super::*;
use memchr::{memchr, memchr2};
use std::borrow::Cow;


/// Splits the engine's CSV output into records.
///
/// Unquoted cells borrow from the input; quoted cells are unescaped into owned
/// strings. Blank lines are skipped.
pub struct TabularDecoder<'a> {
    input: &'a str,
    pos: usize,
    records: u64,
}

impl<'a> TabularDecoder<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.strip_prefix('\u{feff}').unwrap_or(input),
            pos: 0,
            records: 0,
        }
    }

    /// Number of records returned so far, header included.
    pub fn records_read(&self) -> u64 {
        self.records
    }

    pub fn next_record(&mut self) -> Result<Option<Vec<Cow<'a, str>>>, DecodeError> {
        while self.pos < self.input.len() {
            let fields = self.read_record()?;
            let blank = fields.len() == 1 && fields[0].is_empty();
            if !blank {
                self.records += 1;
                return Ok(Some(fields));
            }
        }
        Ok(None)
    }

    fn read_record(&mut self) -> Result<Vec<Cow<'a, str>>, DecodeError> {
        let input = self.input;
        let bytes = input.as_bytes();
        let mut fields = Vec::new();

        loop {
            let field = if bytes.get(self.pos) == Some(&b'"') {
                Cow::Owned(self.read_quoted()?)
            } else {
                let end = memchr2(b',', b'\n', &bytes[self.pos..])
                    .map_or(bytes.len(), |i| self.pos + i);
                let cell = &input[self.pos..end];
                self.pos = end;
                Cow::Borrowed(cell)
            };
            fields.push(field);

            match bytes.get(self.pos) {
                Some(b',') => self.pos += 1,
                Some(_) => {
                    // newline
                    self.pos += 1;
                    break;
                }
                None => break,
            }
        }

        if let Some(last) = fields.last_mut() {
            strip_carriage_return(last);
        }
        Ok(fields)
    }

    /// Reads a quoted cell starting at the opening quote. Text between the
    /// closing quote and the next delimiter is kept as-is.
    fn read_quoted(&mut self) -> Result<String, DecodeError> {
        let input = self.input;
        let bytes = input.as_bytes();
        let mut value = String::new();
        self.pos += 1;

        loop {
            let Some(i) = memchr(b'"', &bytes[self.pos..]) else {
                return Err(DecodeError::UnterminatedQuote {
                    record: self.records + 1,
                });
            };
            value.push_str(&input[self.pos..self.pos + i]);
            self.pos += i + 1;

            if bytes.get(self.pos) == Some(&b'"') {
                value.push('"');
                self.pos += 1;
            } else {
                break;
            }
        }

        let end = memchr2(b',', b'\n', &bytes[self.pos..])
            .map_or(bytes.len(), |i| self.pos + i);
        value.push_str(&input[self.pos..end]);
        self.pos = end;
        Ok(value)
    }
}

fn strip_carriage_return(cell: &mut Cow<'_, str>) {
    match cell {
        Cow::Borrowed(s) => {
            let text: &str = *s;
            if let Some(stripped) = text.strip_suffix('\r') {
                *s = stripped;
            }
        }
        Cow::Owned(s) => {
            if s.ends_with('\r') {
                s.pop();
            }
        }
    }
}

/// Header positions of the projected columns.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    source: usize,
    source_guid: usize,
    source_owner: usize,
    source_owner_guid: usize,
    source_attributed: usize,
}

impl ColumnIndex {
    fn from_header(header: &[Cow<'_, str>]) -> Result<Self, DecodeError> {
        let position = |name: &'static str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(DecodeError::MissingColumn { name })
        };

        Ok(Self {
            source: position(SOURCE)?,
            source_guid: position(SOURCE_GUID)?,
            source_owner: position(SOURCE_OWNER)?,
            source_owner_guid: position(SOURCE_OWNER_GUID)?,
            source_attributed: position(SOURCE_ATTRIBUTED)?,
        })
    }

    fn event(&self, fields: &[Cow<'_, str>], row: u64) -> CombatEvent {
        let cell = |idx: usize| fields.get(idx).map_or("", |c| &**c);

        CombatEvent {
            row,
            source: cell(self.source).to_string(),
            source_guid: cell(self.source_guid).to_string(),
            source_owner: cell(self.source_owner).to_string(),
            source_owner_guid: cell(self.source_owner_guid).to_string(),
            source_attributed: parse_attributed(cell(self.source_attributed)),
        }
    }
}

/// Decodes a full tabular response into events, preserving row order.
///
/// An empty payload has no header and yields no events.
pub fn decode_events(text: &str) -> Result<Vec<CombatEvent>, DecodeError> {
    let mut decoder = TabularDecoder::new(text);
    let Some(header) = decoder.next_record()? else {
        return Ok(Vec::new());
    };
    let columns = ColumnIndex::from_header(&header)?;

    let mut events = Vec::new();
    while let Some(fields) = decoder.next_record()? {
        let row = events.len() as u64 + 1;
        events.push(columns.event(&fields, row));
    }

    tracing::debug!(
        rows = events.len(),
        records = decoder.records_read(),
        "Decoded tabular response"
    );
    Ok(events)
}
