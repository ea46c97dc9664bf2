use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use klf200_frame::{Command, Frame, PayloadLength};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    command: &'static str,
    command_id: String,
    frame: &'a Frame,
    summary: String,
}

impl<'a> FrameOutput<'a> {
    fn new(frame: &'a Frame) -> Self {
        let command = frame.command();
        Self {
            command: command.name(),
            command_id: command_id(command),
            frame,
            summary: frame.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct EncodedOutput {
    pub command: &'static str,
    pub command_id: String,
    pub size: usize,
    pub hex: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl EncodedOutput {
    pub fn new(command: Command, bytes: Vec<u8>) -> Self {
        Self {
            command: command.name(),
            command_id: command_id(command),
            size: bytes.len(),
            hex: hex::encode(&bytes),
            bytes,
        }
    }
}

#[derive(Serialize)]
struct CommandOutput {
    id: String,
    name: &'static str,
    kind: &'static str,
    payload_length: String,
}

/// Print decoded frames. `wire` holds the bytes each frame was decoded from,
/// used by the raw format.
pub fn print_frames(frames: &[Frame], wire: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for frame in frames {
                println!(
                    "{}",
                    serde_json::to_string(&FrameOutput::new(frame))
                        .unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "COMMAND", "FRAME"]);
            for frame in frames {
                let command = frame.command();
                table.add_row(vec![
                    command_id(command),
                    command.name().to_string(),
                    frame.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for frame in frames {
                println!("{} {frame}", frame.command());
            }
        }
        OutputFormat::Raw => print_raw(wire),
    }
}

pub fn print_encoded(encoded: &EncodedOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(encoded).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "COMMAND", "SIZE", "HEX"])
                .add_row(vec![
                    encoded.command_id.clone(),
                    encoded.command.to_string(),
                    encoded.size.to_string(),
                    encoded.hex.clone(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", spaced_hex(&encoded.bytes)),
        OutputFormat::Raw => print_raw(&encoded.bytes),
    }
}

pub fn print_commands(commands: &[(Command, PayloadLength)], format: OutputFormat) {
    let rows: Vec<CommandOutput> = commands
        .iter()
        .map(|&(command, length)| CommandOutput {
            id: command_id(command),
            name: command.name(),
            kind: command_kind(command),
            payload_length: length.to_string(),
        })
        .collect();

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
        ),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "NAME", "KIND", "PAYLOAD"]);
            for row in &rows {
                table.add_row(vec![
                    row.id.clone(),
                    row.name.to_string(),
                    row.kind.to_string(),
                    row.payload_length.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in &rows {
                println!(
                    "{} {:<42} {:<12} {}",
                    row.id, row.name, row.kind, row.payload_length
                );
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn command_id(command: Command) -> String {
    format!("0x{:04x}", command.id())
}

fn command_kind(command: Command) -> &'static str {
    if command.is_request() {
        "request"
    } else if command.is_notification() {
        "notification"
    } else {
        "confirmation"
    }
}

fn spaced_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use klf200_frame::{CommandSendConfirmation, CommandSendConfirmationStatus};

    use super::*;

    #[test]
    fn frame_json_carries_command_and_fields() {
        let frame = Frame::from(CommandSendConfirmation {
            session_id: 1000,
            status: CommandSendConfirmationStatus::Accepted,
        });
        let json = serde_json::to_value(FrameOutput::new(&frame)).unwrap();
        assert_eq!(json["command"], "GW_COMMAND_SEND_CFM");
        assert_eq!(json["command_id"], "0x0301");
        assert_eq!(json["frame"]["CommandSendConfirmation"]["session_id"], 1000);
        assert_eq!(json["frame"]["CommandSendConfirmation"]["status"], "accepted");
    }

    #[test]
    fn encoded_json_omits_raw_bytes() {
        let encoded = EncodedOutput::new(Command::GetVersionReq, vec![0x00, 0x03, 0x00, 0x08, 0x0b]);
        let json = serde_json::to_value(&encoded).unwrap();
        assert_eq!(json["hex"], "000300080b");
        assert_eq!(json["size"], 5);
        assert!(json.get("bytes").is_none());
        assert_eq!(spaced_hex(&encoded.bytes), "00 03 00 08 0b");
    }

    #[test]
    fn command_kinds() {
        assert_eq!(command_kind(Command::CommandSendReq), "request");
        assert_eq!(command_kind(Command::CommandSendCfm), "confirmation");
        assert_eq!(command_kind(Command::ErrorNtf), "notification");
    }
}
