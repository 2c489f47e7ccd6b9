//! Section join: label document feature rows with their section.
//!
//! Inputs:
//!  - sections: TSV `doc_id<TAB>section`
//!  - ids: TSV whose rows with more than one field contribute their first column,
//!    in order, as the document id sequence
//!  - features: one line of space-separated values per document id, same order
//!
//! Output: `section,doc_id,feature...` per features line; unknown ids get an empty section.
//! Fields are written as-is, never quoted, so a `,` inside a field shows up as a separator.

use ahash::RandomState;
use anyhow::{bail, Context, Result};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

pub type SectionMap = HashMap<String, String, RandomState>;

fn tsv_reader<R: Read>(r: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(r)
}

/// Later rows win when an id repeats. Rows with fewer than two fields are ignored.
pub fn read_sections<R: Read>(r: R) -> Result<SectionMap> {
    let mut map = SectionMap::with_hasher(RandomState::new());
    for (i, rec) in tsv_reader(r).records().enumerate() {
        let rec = rec.with_context(|| format!("sections row {}", i + 1))?;
        if rec.len() < 2 {
            continue;
        }
        map.insert(rec[0].to_string(), rec[1].to_string());
    }
    Ok(map)
}

pub fn read_doc_ids<R: Read>(r: R) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    for (i, rec) in tsv_reader(r).records().enumerate() {
        let rec = rec.with_context(|| format!("ids row {}", i + 1))?;
        if rec.len() > 1 {
            ids.push(rec[0].to_string());
        }
    }
    Ok(ids)
}

pub fn read_feature_rows<R: BufRead>(r: R) -> Result<Vec<Vec<String>>> {
    r.lines()
        .enumerate()
        .map(|(i, line)| {
            let line = line.with_context(|| format!("features line {}", i + 1))?;
            Ok(line.split_whitespace().map(str::to_string).collect())
        })
        .collect()
}

/// Join the three inputs and write CSV rows to `out`. Returns the number of rows.
/// Fails before writing anything when the features and ids counts differ.
pub fn join_sections<S: Read, I: Read, F: BufRead, W: Write>(
    sections: S,
    ids: I,
    features: F,
    out: W,
) -> Result<u64> {
    let sections = read_sections(sections)?;
    let ids = read_doc_ids(ids)?;
    let rows = read_feature_rows(features)?;

    if ids.len() != rows.len() {
        bail!(
            "ids/features misaligned: {} document ids (rows with more than one field) but {} feature lines",
            ids.len(),
            rows.len()
        );
    }

    let mut w = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .from_writer(out);
    let mut written = 0u64;
    for (id, feats) in ids.iter().zip(rows.iter()) {
        let section = sections.get(id).map(String::as_str).unwrap_or("");
        let record = [section, id.as_str()].into_iter().chain(feats.iter().map(String::as_str));
        w.write_record(record)?;
        written += 1;
    }
    w.flush()?;
    tracing::info!(rows = written, sections = sections.len(), "join written");
    Ok(written)
}

pub fn join_section_files<W: Write>(sections: &Path, ids: &Path, features: &Path, out: W) -> Result<u64> {
    let open = |p: &Path| File::open(p).with_context(|| format!("open {}", p.display()));
    join_sections(open(sections)?, open(ids)?, BufReader::new(open(features)?), out)
}
