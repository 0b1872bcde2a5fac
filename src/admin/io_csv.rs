// Primitives for reading CSV scenario files.

use log::debug;
use snafu::prelude::*;

use crate::admin::{io_common::make_default_id, *};

pub fn read_csv_scenario(path: String, sfs: &FileSource) -> AdminResult<Vec<ParsedStep>> {
    let default_id = make_default_id(&path);
    let value_idx = sfs.value_column_index()?;
    let has_header = sfs.has_header_row.unwrap_or(true);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .from_path(&path)
        .context(CsvOpenSnafu { path: path.clone() })?;
    let row_offset = usize::from(has_header);

    let mut res: Vec<ParsedStep> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        let lineno = idx + row_offset + 1;
        debug!("{:?} {:?}", lineno, line_r);
        let line = line_r.context(CsvLineParseSnafu {})?;
        let value = line
            .get(value_idx)
            .context(CsvLineTooShortSnafu { lineno })?
            .to_string();
        res.push(ParsedStep {
            id: Some(default_id(lineno)),
            value,
        });
    }
    Ok(res)
}
