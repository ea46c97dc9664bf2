use clap::{Args, Subcommand};
use klf200_frame::codec::DEFAULT_MAX_PACKET_SIZE;
use klf200_frame::FrameConfig;

use crate::exit::{hex_error, CliResult};
use crate::output::OutputFormat;

pub mod commands;
pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a frame given as hex.
    Decode(DecodeArgs),
    /// Encode a frame given as JSON and print its bytes.
    Encode(EncodeArgs),
    /// List every known command with its payload length.
    Commands(CommandsArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub format: OutputFormat,
    pub log_frames: bool,
}

pub fn run(command: Command, ctx: Context) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, ctx),
        Command::Encode(args) => encode::run(args, ctx),
        Command::Commands(args) => commands::run(args, ctx),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes as hex; spaces, colons and a leading 0x are ignored.
    pub hex: String,
    /// Input is a SLIP byte stream holding one or more frames.
    #[arg(long)]
    pub slip: bool,
    /// Skip frames with unknown command ids (with --slip).
    #[arg(long, requires = "slip")]
    pub skip_unknown: bool,
    /// Largest accepted SLIP packet in bytes (with --slip).
    #[arg(long, requires = "slip", default_value_t = DEFAULT_MAX_PACKET_SIZE)]
    pub max_packet_size: usize,
}

impl DecodeArgs {
    pub fn frame_config(&self, ctx: Context) -> FrameConfig {
        FrameConfig {
            max_packet_size: self.max_packet_size,
            skip_unknown_commands: self.skip_unknown,
            log_frames: ctx.log_frames,
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Frame as JSON, e.g. '{"GetNodeInformationRequest":{"node_id":3}}'. Use - to read stdin.
    pub json: String,
    /// Wrap the encoded frame in SLIP.
    #[arg(long)]
    pub slip: bool,
}

#[derive(Args, Debug, Default)]
pub struct CommandsArgs {
    /// Only list requests (frames sent to the gateway).
    #[arg(long)]
    pub requests: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse hex input leniently: whitespace, `:` and `-` separators and a
/// leading `0x` are dropped.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':' && *c != '-')
        .collect();
    hex::decode(digits).map_err(hex_error)
}
