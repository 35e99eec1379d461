// ABOUTME: Raw RGB24 frame transport over byte streams.
// ABOUTME: Reads fixed-size frames, filters them, and writes them back out.

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use vidicon_engine::{Frame, VidiconEngine};

/// Fill `frame` from `reader`.
///
/// Returns `Ok(false)` on a clean end of stream at a frame boundary and an
/// `UnexpectedEof` error when the stream stops mid-frame.
pub fn read_frame<R: Read>(reader: &mut R, frame: &mut Frame) -> io::Result<bool> {
    let buf = frame.data_mut();
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    match filled {
        0 => Ok(false),
        n if n == buf.len() => Ok(true),
        n => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Truncated frame: got {} of {} bytes", n, buf.len()),
        )),
    }
}

/// Filter every frame from `reader` into `writer`; returns the frame count
pub fn run<R: Read, W: Write>(engine: &mut VidiconEngine, reader: &mut R, writer: &mut W) -> Result<u64> {
    let mut frame = Frame::new(engine.geometry());
    let mut frames = 0u64;

    while read_frame(reader, &mut frame).with_context(|| format!("Failed to read frame {}", frames))? {
        engine.filter_frame(&mut frame)?;
        writer
            .write_all(frame.data())
            .with_context(|| format!("Failed to write frame {}", frames))?;
        frames += 1;
    }

    writer.flush().context("Failed to flush output")?;
    Ok(frames)
}
