use anyhow::{Context, Result};
use std::io::{BufRead, BufReader};
use std::path::Path;
use zstd::stream::read::Decoder;

use crate::util::open_with_backoff;

/// Stream a zstd-compressed JSONL file line by line; `on_line` gets the 1-based
/// line number and the line without its `\r?\n` terminator.
///
/// `window_log_max(31)` is requested up front so large-window frames decode.
/// Decode errors abort the read and are reported with the file path.
pub fn for_each_line_cfg(
    path: &Path,
    read_buf_bytes: usize,
    mut on_line: impl FnMut(u64, &str) -> Result<()>,
) -> Result<()> {
    let file = open_with_backoff(path, 16, 50).with_context(|| format!("open {}", path.display()))?;
    let mut decoder = Decoder::new(file)?;
    decoder.window_log_max(31)?;
    let mut reader = BufReader::with_capacity(read_buf_bytes.max(8 * 1024), decoder);

    let mut buf = String::with_capacity(16 * 1024);
    let mut lineno = 0u64;
    loop {
        buf.clear();
        let n = reader.read_line(&mut buf).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "zstd decode failed");
            e
        }).with_context(|| format!("decode {} after line {}", path.display(), lineno))?;
        if n == 0 {
            break;
        }
        lineno += 1;
        if buf.ends_with('\n') {
            let _ = buf.pop();
            if buf.ends_with('\r') { let _ = buf.pop(); }
        }
        on_line(lineno, &buf)?;
    }
    Ok(())
}
