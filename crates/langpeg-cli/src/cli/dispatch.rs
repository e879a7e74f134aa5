//! `*Params` structs that extract typed fields from `ArgMatches`, one per
//! subcommand, handed off to the matching `commands::*::run`.

use std::path::PathBuf;

use clap::ArgMatches;

use crate::util::ColorChoice;

pub struct AstParams {
    pub grammar: PathBuf,
    pub ast_only: bool,
    pub color: ColorChoice,
}

impl AstParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: m.get_one::<PathBuf>("grammar").cloned().expect("required"),
            ast_only: m.get_flag("ast_only"),
            color: ColorChoice::from_matches(m),
        }
    }
}

pub struct CheckParams {
    pub grammar: PathBuf,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: m.get_one::<PathBuf>("grammar").cloned().expect("required"),
            color: ColorChoice::from_matches(m),
        }
    }
}

pub struct DumpParams {
    pub grammar: PathBuf,
    pub optimize: u8,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: m.get_one::<PathBuf>("grammar").cloned().expect("required"),
            optimize: *m.get_one::<u8>("optimize").expect("has default"),
            color: ColorChoice::from_matches(m),
        }
    }
}

pub struct ExecParams {
    pub grammar: PathBuf,
    pub entry: Option<String>,
    pub input_text: Option<String>,
    pub input_file: Option<PathBuf>,
    pub disable_captures: bool,
    pub disable_capture_spaces: bool,
    pub color: ColorChoice,
}

impl ExecParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: m.get_one::<PathBuf>("grammar").cloned().expect("required"),
            entry: m.get_one::<String>("entry").cloned(),
            input_text: m.get_one::<String>("input").cloned(),
            input_file: m.get_one::<PathBuf>("input_file").cloned(),
            disable_captures: m.get_flag("disable_captures"),
            disable_capture_spaces: m.get_flag("disable_capture_spaces"),
            color: ColorChoice::from_matches(m),
        }
    }
}

pub struct TraceParams {
    pub grammar: PathBuf,
    pub entry: Option<String>,
    pub input_text: Option<String>,
    pub input_file: Option<PathBuf>,
    pub color: ColorChoice,
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar: m.get_one::<PathBuf>("grammar").cloned().expect("required"),
            entry: m.get_one::<String>("entry").cloned(),
            input_text: m.get_one::<String>("input").cloned(),
            input_file: m.get_one::<PathBuf>("input_file").cloned(),
            color: ColorChoice::from_matches(m),
        }
    }
}
