//! Generates the man page and shell completions at build time.
//!
//! The CLI definition is shared with the binary by including `src/cli.rs`,
//! which is kept free of crate-internal imports for exactly this reason.

use clap::CommandFactory;
use clap_complete::generate_to;
use clap_complete::shells::{Bash, Fish, Zsh};

include!("src/cli.rs");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");

    let out_dir = std::path::PathBuf::from(std::env::var_os("OUT_DIR").ok_or("OUT_DIR not set")?);

    let mut cmd = Cli::command();

    let man = clap_mangen::Man::new(cmd.clone());
    let mut buf: Vec<u8> = Vec::new();
    man.render(&mut buf)?;
    std::fs::write(out_dir.join("onboard-luns.1"), buf)?;

    generate_to(Bash, &mut cmd, "onboard-luns", &out_dir)?;
    generate_to(Zsh, &mut cmd, "onboard-luns", &out_dir)?;
    generate_to(Fish, &mut cmd, "onboard-luns", &out_dir)?;

    Ok(())
}
