use std::io::Read;

use dmrlink_frame::decode_frame;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_frame, FrameOutput, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = match args.hex {
        Some(hex) => hex,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| io_error("failed to read stdin", err))?;
            buf
        }
    };

    let bytes = parse_hex(&input)?;
    let frame = decode_frame(&bytes).map_err(|err| frame_error("invalid frame", err))?;
    print_frame(&FrameOutput::new(&frame), format);
    Ok(SUCCESS)
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex: {err}")))
}
