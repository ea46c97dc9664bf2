use std::io::Cursor;

use klf200_frame::{decode_frame, Frame, FrameError, FrameReader};

use crate::cmd::{parse_hex, Context, DecodeArgs};
use crate::exit::{frame_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::print_frames;

pub fn run(args: DecodeArgs, ctx: Context) -> CliResult<i32> {
    let bytes = parse_hex(&args.hex)?;

    let frames = if args.slip {
        decode_stream(&args, ctx, &bytes)?
    } else {
        vec![decode_frame(&bytes).map_err(|err| frame_error("decode", err))?]
    };

    tracing::debug!(frames = frames.len(), bytes = bytes.len(), "decoded input");
    print_frames(&frames, &bytes, ctx.format);
    Ok(SUCCESS)
}

fn decode_stream(args: &DecodeArgs, ctx: Context, bytes: &[u8]) -> CliResult<Vec<Frame>> {
    let mut reader = FrameReader::with_config(Cursor::new(bytes), args.frame_config(ctx));
    let mut frames = Vec::new();
    loop {
        match reader.read_frame() {
            Ok(frame) => frames.push(frame),
            Err(FrameError::ConnectionClosed) if reader.has_partial_packet() => {
                return Err(CliError::new(
                    DATA_INVALID,
                    "decode: truncated SLIP packet at end of input",
                ));
            }
            Err(FrameError::ConnectionClosed) => break,
            Err(err) => return Err(frame_error("decode", err)),
        }
    }
    if frames.is_empty() {
        return Err(CliError::new(
            DATA_INVALID,
            "decode: no complete SLIP packet in input",
        ));
    }
    Ok(frames)
}
