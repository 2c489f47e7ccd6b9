use crate::util::{create_with_backoff, open_with_backoff, remove_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered line reader for plain NDJSON collections.
pub struct NdjsonReader {
    rdr: BufReader<File>,
}

impl NdjsonReader {
    pub fn open(path: &Path, buf_bytes: usize) -> io::Result<Self> {
        let f = open_with_backoff(path, 16, 50)?;
        Ok(Self { rdr: BufReader::with_capacity(buf_bytes.max(8 * 1024), f) })
    }

    /// Read the next line into `buf`. Returns the number of bytes read (0 on EOF).
    /// Strips trailing `\r?\n`.
    pub fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_line(buf)?;
        if n == 0 { return Ok(0); }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') { buf.pop(); }
        }
        Ok(n)
    }
}

/// Writes one JSON array to a staging file next to the destination and
/// promotes it on `finish`, so readers never see a half-written array.
/// Dropping the writer without a successful `finish` removes the staging file.
pub struct JsonArrayWriter {
    tmp_path: PathBuf,
    final_path: PathBuf,
    w: Option<BufWriter<File>>,
    pretty: bool,
    written: u64,
    promoted: bool,
}

impl JsonArrayWriter {
    pub fn create(final_path: &Path, pretty: bool, buf_bytes: usize) -> Result<Self> {
        let mut tmp_name = final_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".inprogress");
        let tmp_path = final_path.with_file_name(tmp_name);
        let f = create_with_backoff(&tmp_path, 16, 50)
            .with_context(|| format!("create {}", tmp_path.display()))?;
        let mut this = Self {
            tmp_path,
            final_path: final_path.to_path_buf(),
            w: Some(BufWriter::with_capacity(buf_bytes.max(8 * 1024), f)),
            pretty,
            written: 0,
            promoted: false,
        };
        this.writer()?.write_all(if pretty { b"[\n" } else { b"[" })?;
        Ok(this)
    }

    pub fn tmp_path(&self) -> &Path {
        &self.tmp_path
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>> {
        self.w.as_mut().context("json array writer already closed")
    }

    pub fn push<T: Serialize>(&mut self, item: &T) -> Result<()> {
        let (pretty, first) = (self.pretty, self.written == 0);
        let w = self.writer()?;
        if !first {
            w.write_all(if pretty { b",\n" } else { b"," })?;
        }
        if pretty {
            serde_json::to_writer_pretty(&mut *w, item)?;
        } else {
            serde_json::to_writer(&mut *w, item)?;
        }
        self.written += 1;
        Ok(())
    }

    /// Close the array, flush and move the file into place. Returns the element count.
    pub fn finish(mut self) -> Result<u64> {
        let mut w = self.w.take().context("json array writer already closed")?;
        w.write_all(if self.pretty { b"\n]\n" } else { b"]\n" })?;
        w.flush().with_context(|| format!("flush {}", self.tmp_path.display()))?;
        drop(w);
        replace_file_atomic_backoff(&self.tmp_path, &self.final_path)?;
        self.promoted = true;
        Ok(self.written)
    }
}

impl Drop for JsonArrayWriter {
    fn drop(&mut self) {
        if self.promoted {
            return;
        }
        drop(self.w.take());
        if let Err(e) = remove_with_backoff(&self.tmp_path, 4, 25) {
            tracing::warn!(path = %self.tmp_path.display(), error = %e, "could not remove staging file");
        }
    }
}
