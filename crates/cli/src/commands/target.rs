use std::process::ExitCode;

use bh_core::target::parse_target_host;

use crate::args::TargetArgs;

pub fn execute(args: &TargetArgs) -> ExitCode {
    let target = parse_target_host(&args.host, &args.default);
    println!("protocol: {}", target.protocol);
    println!("host: {}", target.host);
    println!("port: {}", target.port);
    ExitCode::SUCCESS
}
