//! Command-line interface for generating study inputs and running scaling
//! studies against an external SSSP solver.

mod commands;

pub use commands::{
    CaseArg, Cli, CliError, Command, ExecutionSummary, GenerateCommand, HarnessArgs, RunCommand,
    StudyCommand, StudyReport, SuiteCommand, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
