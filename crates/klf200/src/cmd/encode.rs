use std::io::Read;

use klf200_frame::{Frame, FrameConfig, FrameWriter};

use crate::cmd::{Context, EncodeArgs};
use crate::exit::{frame_error, json_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_encoded, EncodedOutput};

pub fn run(args: EncodeArgs, ctx: Context) -> CliResult<i32> {
    let json = if args.json == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|err| CliError::new(INTERNAL, format!("read stdin: {err}")))?;
        buf
    } else {
        args.json
    };

    let frame = parse_frame(&json)?;
    let bytes = encode(&frame, args.slip, ctx)?;
    tracing::debug!(command = %frame.command(), size = bytes.len(), "encoded frame");

    print_encoded(&EncodedOutput::new(frame.command(), bytes), ctx.format);
    Ok(SUCCESS)
}

fn parse_frame(json: &str) -> CliResult<Frame> {
    serde_json::from_str(json).map_err(|err| json_error("invalid frame JSON", err))
}

fn encode(frame: &Frame, slip: bool, ctx: Context) -> CliResult<Vec<u8>> {
    if !slip {
        return frame
            .to_bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|err| frame_error("encode", err));
    }

    let config = FrameConfig {
        log_frames: ctx.log_frames,
        ..FrameConfig::default()
    };
    let mut writer = FrameWriter::with_config(Vec::new(), config);
    writer
        .write_frame(frame)
        .map_err(|err| frame_error("encode", err))?;
    Ok(writer.into_inner())
}
