// Primitives for reading JSON scenario files.

use std::fs;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::admin::{io_common::make_default_id, *};

// A step is either a bare string (the next selector value) or an object
// carrying its own identifier.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum JsonStep {
    Bare(String),
    Full { id: Option<String>, value: String },
}

pub fn read_json_scenario(path: String, _sfs: &FileSource) -> AdminResult<Vec<ParsedStep>> {
    let default_id = make_default_id(&path);
    let contents = fs::read_to_string(&path).context(OpeningJsonSnafu {})?;
    let raw_steps: Vec<JsonStep> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;

    let mut res: Vec<ParsedStep> = Vec::new();
    for (idx, raw) in raw_steps.into_iter().enumerate() {
        let lineno = idx + 1;
        let ps = match raw {
            JsonStep::Bare(value) => ParsedStep {
                id: Some(default_id(lineno)),
                value,
            },
            JsonStep::Full { id, value } => ParsedStep {
                id: id.or_else(|| Some(default_id(lineno))),
                value,
            },
        };
        res.push(ps);
    }
    Ok(res)
}
