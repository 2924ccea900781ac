use dmrlink_link::SoftwareInfo;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("dmrlink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    let software = SoftwareInfo::current();
    println!("name: dmrlink");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("software_id: {}", software.software_id);
    println!("package_id: {}", software.package_id);
    println!(
        "target: {}",
        option_env!("DMRLINK_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "rustc: {}",
        option_env!("RUSTC_VERSION").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("features: link={}, cli=true", cfg!(feature = "link"));

    Ok(SUCCESS)
}
