//! Build the frames for opening a window to 40 %, send them through an
//! in-memory SLIP stream and decode them again.
//!
//! Run with:
//!   cargo run -p klf200 --example open-window

use std::io::Cursor;

use klf200::frame::{
    CommandSendRequest, Frame, FrameReader, FrameWriter, HouseStatusMonitorEnableRequest,
    Parameter, PasswordEnterRequest,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let frames = vec![
        Frame::from(PasswordEnterRequest::new("velux123")),
        Frame::from(HouseStatusMonitorEnableRequest),
        Frame::from(CommandSendRequest::new(1, vec![0], Parameter::from_percent(40))),
    ];

    let mut writer = FrameWriter::new(Vec::new());
    for frame in &frames {
        writer.write_frame(frame)?;
    }
    let wire = writer.into_inner();
    println!("{} bytes on the wire", wire.len());

    for frame in FrameReader::new(Cursor::new(wire)) {
        let frame = frame?;
        println!("{} {frame}", frame.command());
    }
    Ok(())
}
