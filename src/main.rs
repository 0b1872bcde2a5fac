use clap::Parser;
use log::info;
use snafu::ErrorCompat;

mod admin;
mod args;

use crate::admin::{run_form_session, run_input_session, run_values_session, AdminResult};
use crate::args::Args;

fn main() {
    let args = Args::parse();
    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    info!("arguments: {:?}", args);

    let res: AdminResult<()> = match (&args.values, &args.input, &args.config) {
        (Some(values), _, _) if !values.is_empty() => {
            run_values_session(values, args.reference.clone(), args.out.clone())
        }
        (_, Some(input), _) => run_input_session(
            input.clone(),
            args.input_type.clone(),
            args.reference.clone(),
            args.out.clone(),
        ),
        (_, _, Some(config)) => {
            run_form_session(config.clone(), args.reference.clone(), args.out.clone())
        }
        _ => {
            eprintln!("No input provided. Use --config, --input or --values. See --help.");
            std::process::exit(2);
        }
    };

    if let Err(e) = res {
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        } else {
            eprintln!("No trace found");
        }
        std::process::exit(1);
    }
}
