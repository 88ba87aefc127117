use {
  anyhow::Context,
  arguments::Arguments,
  clap::{ArgAction, Parser},
  htmlmend::{
    DedupeStrategy, Defect, PatchOptions, Patcher, RunOptions, Runner, expand,
  },
  log::LevelFilter,
  std::{path::PathBuf, process},
};

mod arguments;

type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;

fn main() {
  match Arguments::parse().run() {
    Ok(true) => {}
    Ok(false) => process::exit(1),
    Err(error) => {
      eprintln!("error: {error:#}");
      process::exit(1);
    }
  }
}
