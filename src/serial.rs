// serial.rs

use crate::*;

pub const LINE_MAX: usize = 256;

/// Non-blocking byte input, i.e. a UART rx fifo.
pub trait ByteSource {
    /// Next byte if one is waiting, `None` when the fifo is empty.
    fn read_byte(&mut self) -> anyhow::Result<Option<u8>>;
}

/// Collects bytes into newline terminated lines without ever waiting for
/// more input. Partial lines are kept until the rest arrives.
pub struct LineReader<S> {
    name: &'static str,
    source: S,
    buf: heapless::Vec<u8, LINE_MAX>,
    overflow: bool,
}

impl<S: ByteSource> LineReader<S> {
    pub fn new(name: &'static str, source: S) -> Self {
        LineReader {
            name,
            source,
            buf: heapless::Vec::new(),
            overflow: false,
        }
    }

    /// Drains the source up to the next complete, non-empty line.
    pub fn poll_line(&mut self) -> Option<String> {
        loop {
            let byte = match self.source.read_byte() {
                Ok(Some(b)) => b,
                Ok(None) => return None,
                Err(e) => {
                    error!("{}: read error {e:?}", self.name);
                    return None;
                }
            };

            match byte {
                b'\n' => {
                    if self.overflow {
                        warn!("{}: line longer than {LINE_MAX} bytes dropped", self.name);
                        self.overflow = false;
                        self.buf.clear();
                        continue;
                    }
                    let line = String::from_utf8(self.buf.to_vec());
                    self.buf.clear();
                    match line {
                        Ok(line) if line.is_empty() => {}
                        Ok(line) => return Some(line),
                        Err(e) => warn!("{}: dropped non-utf8 line: {e}", self.name),
                    }
                }
                b'\r' => {}
                b => {
                    if !self.overflow && self.buf.push(b).is_err() {
                        self.overflow = true;
                    }
                }
            }
        }
    }
}

#[cfg(target_os = "espidf")]
mod uart {
    use esp_idf_hal::{delay::NON_BLOCK, uart::UartDriver};

    use super::ByteSource;

    impl ByteSource for UartDriver<'_> {
        fn read_byte(&mut self) -> anyhow::Result<Option<u8>> {
            let mut b = [0u8; 1];
            Ok(match self.read(&mut b, NON_BLOCK)? {
                0 => None,
                _ => Some(b[0]),
            })
        }
    }
}


// EOF
