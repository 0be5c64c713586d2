use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::types::FastqRead;

/// Opens `path` for buffered reading, decompressing when it ends in ".gz".
pub fn open_maybe_gz(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let f = File::open(path)?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };
    Ok(reader)
}

/// A lazy producer of reads. Yields `Err` at most once, after which it is exhausted.
pub trait ReadSource: Iterator<Item = io::Result<FastqRead>> {}

impl<I: Iterator<Item = io::Result<FastqRead>>> ReadSource for I {}

/// Streaming 4-line FASTQ parser.
pub struct FastqReader<R: BufRead> {
    reader: R,
    line: String,
    line_no: usize,
    failed: bool,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_no: 0,
            failed: false,
        }
    }

    /// Reads the next line into `self.line` without its line terminator.
    /// Returns `false` at EOF.
    fn next_line(&mut self) -> io::Result<bool> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(false);
        }
        self.line_no += 1;
        let trimmed_len = self.line.trim_end_matches(['\n', '\r']).len();
        self.line.truncate(trimmed_len);
        Ok(true)
    }

    fn malformed(&self, message: &str) -> io::Error {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("malformed FASTQ record at line {}: {}", self.line_no, message),
        )
    }

    fn read_record(&mut self) -> io::Result<Option<FastqRead>> {
        // 1) header, skipping blank lines between records
        loop {
            if !self.next_line()? {
                return Ok(None);
            }
            if !self.line.is_empty() {
                break;
            }
        }
        let header = match self.line.strip_prefix('@') {
            Some(h) => h.to_string(),
            None => return Err(self.malformed("header does not start with '@'")),
        };
        let (id, description) = match header.split_once(' ') {
            Some((id, desc)) => (id.to_string(), Some(desc.to_string())),
            None => (header, None),
        };

        // 2) sequence
        if !self.next_line()? {
            return Err(self.malformed("missing sequence line"));
        }
        let seq = self.line.as_bytes().to_vec();

        // 3) plus line
        if !self.next_line()? {
            return Err(self.malformed("missing '+' line"));
        }
        if !self.line.starts_with('+') {
            return Err(self.malformed("separator line does not start with '+'"));
        }

        // 4) qualities
        if !self.next_line()? {
            return Err(self.malformed("missing quality line"));
        }
        let quals = self.line.as_bytes().to_vec();
        if quals.len() != seq.len() {
            return Err(self.malformed("sequence and quality lengths differ"));
        }

        Ok(Some(FastqRead {
            id,
            description,
            seq,
            quals,
        }))
    }
}

impl FastqReader<Box<dyn BufRead>> {
    /// Opens a FASTQ file, supporting .gz
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::new(open_maybe_gz(path.as_ref())?))
    }
}

impl<R: BufRead> Iterator for FastqReader<R> {
    type Item = io::Result<FastqRead>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_record() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// An append-only destination for annotated reads.
pub trait ReadSink {
    fn write_read(&mut self, read: &FastqRead) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

pub struct FastqWriter<W: Write> {
    inner: W,
}

impl<W: Write> FastqWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ReadSink for FastqWriter<W> {
    fn write_read(&mut self, read: &FastqRead) -> io::Result<()> {
        let w = &mut self.inner;
        w.write_all(b"@")?;
        w.write_all(read.id.as_bytes())?;
        if let Some(desc) = &read.description {
            w.write_all(b" ")?;
            w.write_all(desc.as_bytes())?;
        }
        w.write_all(b"\n")?;
        w.write_all(&read.seq)?;
        w.write_all(b"\n+\n")?;
        w.write_all(&read.quals)?;
        w.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// A created output file, plain or gzip-compressed.
pub enum OutputFile {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputFile {
    pub fn create<P: AsRef<Path>>(path: P, gzip: bool) -> io::Result<Self> {
        let f = BufWriter::new(File::create(path)?);
        Ok(if gzip {
            OutputFile::Gzip(GzEncoder::new(f, Compression::default()))
        } else {
            OutputFile::Plain(f)
        })
    }

    /// Flushes everything and, for gzip, writes the stream trailer.
    pub fn finish(self) -> io::Result<()> {
        match self {
            OutputFile::Plain(mut w) => w.flush(),
            OutputFile::Gzip(enc) => enc.finish()?.flush(),
        }
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputFile::Plain(w) => w.write(buf),
            OutputFile::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputFile::Plain(w) => w.flush(),
            OutputFile::Gzip(w) => w.flush(),
        }
    }
}
