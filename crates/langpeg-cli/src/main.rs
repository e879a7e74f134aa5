mod cli;
mod commands;
mod util;

use cli::{AstParams, CheckParams, DumpParams, ExecParams, TraceParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    let code = match matches.subcommand() {
        Some(("ast", m)) => commands::ast::run(AstParams::from_matches(m)),
        Some(("check", m)) => commands::check::run(CheckParams::from_matches(m)),
        Some(("dump", m)) => commands::dump::run(DumpParams::from_matches(m)),
        Some(("exec", m)) => commands::exec::run(ExecParams::from_matches(m)),
        Some(("trace", m)) => commands::trace::run(TraceParams::from_matches(m)),
        _ => unreachable!("clap should have caught this"),
    };

    std::process::exit(code);
}
