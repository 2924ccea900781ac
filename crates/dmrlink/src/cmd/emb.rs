use dmrlink_dmr::{parse_emb, Emb, EMB_BITS};

use crate::cmd::EmbArgs;
use crate::exit::{dmr_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_emb, EmbOutput, OutputFormat};

pub fn run(args: EmbArgs, format: OutputFormat) -> CliResult<i32> {
    if args.encode {
        let (Some(color_code), Some(lcss)) = (args.color_code, args.lcss) else {
            return Err(CliError::new(
                USAGE,
                "--encode needs --color-code and --lcss",
            ));
        };
        let emb = Emb::new(color_code, lcss.into());
        print_emb(&EmbOutput::new(&emb), format);
        return Ok(SUCCESS);
    }

    let input = args
        .codeword
        .ok_or_else(|| CliError::new(USAGE, "missing codeword"))?;
    let bits = parse_codeword_bits(&input)?;
    let emb = parse_emb(&bits).map_err(|err| dmr_error("invalid EMB", err))?;
    print_emb(&EmbOutput::new(&emb), format);
    Ok(SUCCESS)
}

/// Accept `0x`-prefixed hex or exactly 16 binary digits.
fn parse_codeword_bits(input: &str) -> CliResult<Vec<u8>> {
    let input = input.trim();
    if let Some(hex) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        let value = u16::from_str_radix(hex, 16)
            .map_err(|_| CliError::new(USAGE, format!("invalid hex codeword: {input}")))?;
        return Ok((0..EMB_BITS)
            .rev()
            .map(|i| ((value >> i) & 1) as u8)
            .collect());
    }

    if input.len() == EMB_BITS && input.bytes().all(|b| b == b'0' || b == b'1') {
        return Ok(input.bytes().map(|b| b - b'0').collect());
    }

    Err(CliError::new(
        USAGE,
        format!("codeword must be 0x-prefixed hex or {EMB_BITS} binary digits: {input}"),
    ))
}
