// src/csl/quoting.rs
//
// The `csv` reader accepts a quoted field that is still open at end of input
// and returns everything up to EOF as that one field. `QuoteGuard` follows the
// same quoting rules over the raw bytes and turns that case into an I/O error,
// which the reader surfaces as a fatal parse error.

use std::io::{self, Read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    /// A `"` inside a quoted field: either an escaped quote or the close.
    QuoteInQuoted,
}

/// Reader adapter that fails at EOF if a quoted field was never closed.
#[derive(Debug)]
pub struct QuoteGuard<R> {
    inner: R,
    state: State,
    line: u64,
    opened_at: u64,
}

impl<R: Read> QuoteGuard<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            state: State::FieldStart,
            line: 1,
            opened_at: 0,
        }
    }

    fn feed(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if b == b'\n' {
                self.line += 1;
            }
            self.state = match (self.state, b) {
                (State::FieldStart, b'"') => {
                    self.opened_at = self.line;
                    State::Quoted
                }
                (State::Quoted, b'"') => State::QuoteInQuoted,
                (State::Quoted, _) => State::Quoted,
                (State::QuoteInQuoted, b'"') => State::Quoted,
                (_, b',' | b'\n' | b'\r') => State::FieldStart,
                _ => State::Unquoted,
            };
        }
    }
}

impl<R: Read> Read for QuoteGuard<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 && !buf.is_empty() && self.state == State::Quoted {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unterminated quoted field opened on line {}", self.opened_at),
            ));
        }
        self.feed(&buf[..n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn drain(input: &[u8]) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        QuoteGuard::new(input).read_to_end(&mut out)?;
        Ok(out)
    }

    #[test]
    fn passes_well_formed_input_through() -> Result<()> {
        let input = b"a,\"b, \"\"quoted\"\"\",c\r\n\"multi\nline\",x\n";
        assert_eq!(drain(input)?, input.to_vec());
        Ok(())
    }

    #[test]
    fn quote_inside_unquoted_field_is_literal() -> Result<()> {
        drain(b"SSI,1,Entity,SDN,Acme \"Big\" Co\n")?;
        drain(b"5\" gauge,x")?;
        Ok(())
    }

    #[test]
    fn open_quote_at_eof_is_an_error() {
        let err = drain(b"a,b\nSSI,1,\"Unclosed Co\nSSI,2,Other\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("line 2"), "{}", err);
    }

    #[test]
    fn escaped_quote_at_eof_is_still_open() {
        assert!(drain(b"\"ends with \"\"").is_err());
        assert!(drain(b"\"closed\"").is_ok());
    }
}
