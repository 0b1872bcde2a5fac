use log::{debug, info, warn};

use vote_form::builder::Builder;
use vote_form::*;

use snafu::{prelude::*, ErrorCompat, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub use crate::admin::config_reader::*;

pub mod io_common;
pub mod io_csv;
pub mod io_json;

#[derive(Debug, Snafu)]
pub enum AdminError {
    #[snafu(display(""))]
    OpeningJson { source: std::io::Error },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display(""))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display(""))]
    ParsingJsonNumber {},
    #[snafu(display(""))]
    MissingParentDir {},

    #[snafu(display("The form description is invalid: {source}"))]
    InvalidForm { source: FormErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type AdminResult<T> = Result<T, AdminError>;

fn trace_to_json(records: &[StepRecord]) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for r in records.iter() {
        let mut groups: JSMap<String, JSValue> = JSMap::new();
        for (name, visible) in r.groups.iter() {
            let state = if *visible { "visible" } else { "hidden" };
            groups.insert(name.clone(), json!(state));
        }
        let js = json!({
            "step": r.step,
            "event": r.event,
            "value": r.value,
            "regionGroups": groups
        });
        l.push(js);
    }
    l
}

pub mod config_reader {
    use crate::admin::*;
    use log::debug;
    use serde::{Deserialize, Serialize};
    use serde_json::Value as JSValue;
    use snafu::prelude::*;
    use std::fs;

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct OutputSettings {
        #[serde(rename = "sessionName")]
        pub session_name: String,
        #[serde(rename = "outputDirectory")]
        pub output_directory: Option<String>,
        #[serde(rename = "sessionDate")]
        pub session_date: Option<String>,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct OutputConfig {
        pub session: String,
        pub date: Option<String>,
        pub selector: String,
        #[serde(rename = "regionGroups")]
        pub region_groups: Vec<String>,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct SelectorDescription {
        pub id: String,
        #[serde(rename = "initialValue")]
        pub initial_value: Option<String>,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct RegionGroupDescription {
        pub id: String,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct FormDescription {
        #[serde(rename = "electionSelector")]
        pub election_selector: SelectorDescription,
        #[serde(rename = "regionGroups")]
        pub region_groups: Vec<RegionGroupDescription>,
    }

    impl FormDescription {
        /// The layout of the vote change form: one election selector and
        /// the two vote sub-form groups.
        pub fn vote_entry() -> FormDescription {
            FormDescription {
                election_selector: SelectorDescription {
                    id: "election".to_string(),
                    initial_value: None,
                },
                region_groups: vec![
                    RegionGroupDescription {
                        id: "pluralities".to_string(),
                    },
                    RegionGroupDescription {
                        id: "preferentials".to_string(),
                    },
                ],
            }
        }
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct FileSource {
        pub provider: String,
        #[serde(rename = "filePath")]
        pub file_path: String,
        #[serde(rename = "valueColumnIndex")]
        pub _value_column_index: Option<JSValue>,
        #[serde(rename = "hasHeaderRow")]
        pub has_header_row: Option<bool>,
    }

    impl FileSource {
        // The configuration is 1-based, like the columns of a spreadsheet.
        pub fn value_column_index(&self) -> AdminResult<usize> {
            match &self._value_column_index {
                None => Ok(0),
                Some(_) => {
                    let x = read_js_int(&self._value_column_index)?;
                    if x == 0 {
                        return None.context(ParsingJsonNumberSnafu {});
                    }
                    Ok(x - 1)
                }
            }
        }
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct SessionConfig {
        #[serde(rename = "outputSettings")]
        pub output_settings: OutputSettings,
        pub form: FormDescription,
        #[serde(rename = "scenarioFileSources")]
        pub scenario_file_sources: Vec<FileSource>,
    }

    pub fn read_reference(path: String) -> AdminResult<JSValue> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
        debug!("read content: {:?}", contents);
        let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        Ok(js)
    }

    fn read_js_int(x: &Option<JSValue>) -> AdminResult<usize> {
        match x {
            Some(JSValue::Number(n)) => n
                .as_u64()
                .map(|x| x as usize)
                .context(ParsingJsonNumberSnafu {}),
            Some(JSValue::String(s)) => s.parse::<usize>().ok().context(ParsingJsonNumberSnafu {}),
            _ => None.context(ParsingJsonNumberSnafu {}),
        }
    }
}

/// A scenario step, as parsed by the readers.
/// This is the raw selector value, before replay.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedStep {
    pub id: Option<String>,
    pub value: String,
}

/// The recorded state of the form after one event.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StepRecord {
    pub step: u32,
    pub event: String,
    pub value: String,
    pub groups: Vec<(String, bool)>,
}

fn read_scenario_data(root_path: String, sfs: &FileSource) -> AdminResult<Vec<ParsedStep>> {
    let p: PathBuf = [root_path, sfs.file_path.clone()].iter().collect();
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read scenario file {:?}", p2);
    match sfs.provider.as_str() {
        "json" => io_json::read_json_scenario(p2, sfs),
        "csv" => io_csv::read_csv_scenario(p2, sfs),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

/// Replays a scenario against a fresh document built from the given layout.
///
/// The first record is the state right after the ready event; one more
/// record follows per change step.
pub fn run_session(form: &FormDescription, steps: &[ParsedStep]) -> AdminResult<Vec<StepRecord>> {
    let selector = form.election_selector.id.as_str();
    let group_names: Vec<String> = form.region_groups.iter().map(|g| g.id.clone()).collect();
    let initial = form.election_selector.initial_value.clone().unwrap_or_default();

    let mut builder = Builder::new()
        .selector(selector, initial.as_str())
        .context(InvalidFormSnafu)?;
    for g in group_names.iter() {
        builder = builder.region_group(g).context(InvalidFormSnafu)?;
    }
    let mut doc = builder.build();
    doc.install(VisibilityController::new(selector, &group_names));
    doc.ready();

    let mut records: Vec<StepRecord> = Vec::new();
    records.push(record_state(0, "ready", &doc, selector, &group_names));
    for (idx, step) in steps.iter().enumerate() {
        debug!(
            "run_session: step {:?} id {:?} value {:?}",
            idx + 1,
            step.id,
            step.value
        );
        doc.set_selector_value(selector, step.value.as_str());
        records.push(record_state(
            (idx + 1) as u32,
            "change",
            &doc,
            selector,
            &group_names,
        ));
    }
    Ok(records)
}

fn record_state(
    step: u32,
    event: &str,
    doc: &FormDocument,
    selector: &str,
    groups: &[String],
) -> StepRecord {
    StepRecord {
        step,
        event: event.to_string(),
        value: doc.selector_value(selector).unwrap_or("").to_string(),
        groups: groups
            .iter()
            .map(|g| (g.clone(), doc.is_visible(g).unwrap_or(true)))
            .collect(),
    }
}

fn build_summary_js(config: &SessionConfig, records: &[StepRecord]) -> JSValue {
    let c = OutputConfig {
        session: config.output_settings.session_name.clone(),
        date: config.output_settings.session_date.clone(),
        selector: config.form.election_selector.id.clone(),
        region_groups: config.form.region_groups.iter().map(|g| g.id.clone()).collect(),
    };
    json!({
        "config": c,
        "trace": trace_to_json(records) })
}

fn emit_summary(
    config: &SessionConfig,
    records: &[StepRecord],
    out_path: Option<String>,
    check_trace_path: Option<String>,
) -> AdminResult<()> {
    let result_js = build_summary_js(config, records);
    let pretty_js_trace = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match out_path {
        Some(p) if p != "stdout" => {
            fs::write(p.as_str(), pretty_js_trace.as_str()).context(OpeningJsonSnafu {})?;
            info!("Trace written to {:?}", p);
        }
        _ => println!("{}", pretty_js_trace),
    }

    // The reference trace, if provided for comparison
    if let Some(trace_p) = check_trace_path {
        let trace_ref = read_reference(trace_p)?;
        info!("reference: {:?}", trace_ref);
        let pretty_js_ref = serde_json::to_string_pretty(&trace_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_ref != pretty_js_trace {
            warn!("Found differences with the reference trace");
            print_diff(pretty_js_ref.as_str(), pretty_js_trace.as_ref(), "\n");
            whatever!("Difference detected between replayed trace and reference trace")
        }
    }
    Ok(())
}

pub fn run_form_session(
    config_path: String,
    check_trace_path: Option<String>,
    out_path: Option<String>,
) -> AdminResult<()> {
    let config_p = Path::new(config_path.as_str());
    let config_str = fs::read_to_string(config_path.clone()).context(OpeningJsonSnafu {})?;
    let config: SessionConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    info!("config: {:?}", config);

    if config.scenario_file_sources.is_empty() {
        warn!("No scenario sources: the form is only replayed to the ready state");
    }

    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;
    let mut steps: Vec<ParsedStep> = Vec::new();
    for sfs in config.scenario_file_sources.iter() {
        let mut file_steps =
            read_scenario_data(root_p.as_os_str().to_str().unwrap().to_string(), sfs)?;
        steps.append(&mut file_steps);
    }

    info!("steps: {:?}", steps);

    let records = run_session(&config.form, &steps)?;
    emit_summary(&config, &records, out_path, check_trace_path)
}

fn inline_config(session_name: &str) -> SessionConfig {
    SessionConfig {
        output_settings: OutputSettings {
            session_name: session_name.to_string(),
            output_directory: None,
            session_date: None,
        },
        form: FormDescription::vote_entry(),
        scenario_file_sources: Vec::new(),
    }
}

/// Replays the values given on the command line against the canonical
/// vote-entry layout.
pub fn run_values_session(
    values: &[String],
    check_trace_path: Option<String>,
    out_path: Option<String>,
) -> AdminResult<()> {
    let config = inline_config("inline");
    let steps: Vec<ParsedStep> = values
        .iter()
        .enumerate()
        .map(|(idx, v)| ParsedStep {
            id: Some(format!("arg-{}", idx + 1)),
            value: v.clone(),
        })
        .collect();
    let records = run_session(&config.form, &steps)?;
    emit_summary(&config, &records, out_path, check_trace_path)
}

/// Replays a standalone scenario file against the canonical vote-entry
/// layout.
pub fn run_input_session(
    input_path: String,
    input_type: Option<String>,
    check_trace_path: Option<String>,
    out_path: Option<String>,
) -> AdminResult<()> {
    let p = Path::new(input_path.as_str());
    let root_p = p.parent().context(MissingParentDirSnafu {})?;
    let file_name = match p.file_name().and_then(|f| f.to_str()) {
        Some(f) => f.to_string(),
        None => whatever!("Not a scenario file path: {:?}", input_path),
    };
    let sfs = FileSource {
        provider: input_type.unwrap_or_else(|| "json".to_string()),
        file_path: file_name,
        _value_column_index: None,
        has_header_row: None,
    };
    let steps = read_scenario_data(root_p.as_os_str().to_str().unwrap().to_string(), &sfs)?;
    info!("steps: {:?}", steps);

    let config = inline_config("inline");
    let records = run_session(&config.form, &steps)?;
    emit_summary(&config, &records, out_path, check_trace_path)
}

fn run_replay_test(test_name: &str, config_lpath: &str, trace_lpath: &str) {
    let test_dir = option_env!("VOTEFORM_TEST_DIR")
        .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata"));
    info!("Running test {}", test_name);
    let res = run_form_session(
        format!("{}/{}/{}", test_dir, test_name, config_lpath),
        Some(format!("{}/{}/{}", test_dir, test_name, trace_lpath)),
        Some("stdout".to_string()),
    );
    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        } else {
            eprintln!("No trace found");
        }
        panic!("Test {} failed", test_name);
    }
}

pub fn test_wrapper(test_name: &str) {
    run_replay_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_trace.json", test_name).as_str(),
    )
}

#[cfg(test)]
mod tests {

    use super::test_wrapper;
    use super::{run_form_session, run_session, FormDescription, ParsedStep};

    fn steps(values: &[&str]) -> Vec<ParsedStep> {
        values
            .iter()
            .map(|v| ParsedStep {
                id: None,
                value: v.to_string(),
            })
            .collect()
    }

    #[test]
    fn hidden_on_load_test() {
        test_wrapper("hidden_on_load_test");
    }

    #[test]
    fn visible_on_load_test() {
        test_wrapper("visible_on_load_test");
    }

    #[test]
    fn select_election_test() {
        test_wrapper("select_election_test");
    }

    #[test]
    fn clear_selection_test() {
        test_wrapper("clear_selection_test");
    }

    #[test]
    fn csv_scenario_test() {
        test_wrapper("csv_scenario_test");
    }

    #[test]
    fn multi_source_test() {
        test_wrapper("multi_source_test");
    }

    #[test]
    fn reference_mismatch_test() {
        let test_dir = option_env!("VOTEFORM_TEST_DIR")
            .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata"));
        let res = run_form_session(
            format!("{}/hidden_on_load_test/hidden_on_load_test_config.json", test_dir),
            Some(format!(
                "{}/visible_on_load_test/visible_on_load_test_expected_trace.json",
                test_dir
            )),
            Some("stdout".to_string()),
        );
        assert!(res.is_err());
    }

    #[test]
    fn missing_config_test() {
        let res = run_form_session(
            "/nonexistent/nope_config.json".to_string(),
            None,
            Some("stdout".to_string()),
        );
        assert!(res.is_err());
    }

    #[test]
    fn unknown_provider_test() {
        let sfs = super::FileSource {
            provider: "xlsx".to_string(),
            file_path: "steps.xlsx".to_string(),
            _value_column_index: None,
            has_header_row: None,
        };
        let res = super::read_scenario_data(".".to_string(), &sfs);
        assert!(res.is_err());
    }

    #[test]
    fn replay_records_every_event() {
        let form = FormDescription::vote_entry();
        let records = run_session(&form, &steps(&["42", "", "7"])).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].event, "ready");
        let expected = [false, true, false, true];
        for (r, exp) in records.iter().zip(expected.iter()) {
            for (_, visible) in r.groups.iter() {
                assert_eq!(visible, exp);
            }
        }
    }

    #[test]
    fn groups_never_diverge() {
        let form = FormDescription::vote_entry();
        let records = run_session(&form, &steps(&["3", "", "9", "9", ""])).unwrap();
        for r in records.iter() {
            assert_eq!(r.groups.len(), 2);
            assert_eq!(r.groups[0].1, r.groups[1].1);
        }
    }

    #[test]
    fn repeated_value_is_idempotent() {
        let form = FormDescription::vote_entry();
        let records = run_session(&form, &steps(&["7", "7"])).unwrap();
        assert_eq!(records[1].groups, records[2].groups);
    }

    #[test]
    fn preselected_value_visible_at_ready() {
        let mut form = FormDescription::vote_entry();
        form.election_selector.initial_value = Some("42".to_string());
        let records = run_session(&form, &[]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, "42");
        for (_, visible) in records[0].groups.iter() {
            assert!(*visible);
        }
    }

    #[test]
    fn conflicting_layout_is_rejected() {
        let mut form = FormDescription::vote_entry();
        form.region_groups[0].id = "election".to_string();
        let res = run_session(&form, &[]);
        assert!(res.is_err());
    }
}
