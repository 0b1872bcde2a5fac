use clap::Parser;

/// This is a replay tool for the election vote-entry admin form.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the form session description. (Only JSON session
    /// descriptions are currently supported) For more information about the file format, read the
    /// documentation.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the expected trace of the session in JSON format.
    /// If provided, voteform will check that the replayed trace matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the trace of the session will be written in
    /// JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, a scenario file with the successive values of the
    /// election selector, replayed against the canonical vote-entry layout. Setting this option
    /// overrides what may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default json) The type of the scenario input. See documentation for all the input types.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (list of values, repeatable) If specified, the successive values taken by the election
    /// selector, bypassing any scenario file. Use an empty string to clear the selection.
    #[clap(long, value_parser)]
    pub values: Option<Vec<String>>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
