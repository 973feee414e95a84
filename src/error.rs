use log::error;
use snafu::prelude::*;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PaintError {
    #[snafu(display("Invalid {} size: expected {} bytes, got {}", what, expected, actual))]
    InvalidBufferSize {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[snafu(display("Invalid tile map bank: {}", bank))]
    InvalidMapBank { bank: u8 },
    #[snafu(display("Video memory address out of range: ${:04x}", address))]
    VideoMemoryOutOfRange { address: u16 },
    #[snafu(display("Failed to read snapshot {}: {}", path.display(), source))]
    SnapshotIo { path: PathBuf, source: std::io::Error },
    #[snafu(display("Failed to open snapshot archive {}: {}", path.display(), source))]
    SnapshotArchive {
        path: PathBuf,
        source: zip::result::ZipError,
    },
    #[snafu(display("Snapshot is missing entry: {}", name))]
    MissingSnapshotEntry { name: String },
    #[snafu(display("Frontend failed: {}", message))]
    Frontend { message: String },
}

/// Rejects a buffer handed over by the engine when its length is wrong.
pub fn ensure_size(what: &'static str, expected: usize, actual: usize) -> Result<(), PaintError> {
    if expected != actual {
        error!("Rejecting {} of {} bytes, expected {}", what, actual, expected);
        return InvalidBufferSizeSnafu { what, expected, actual }.fail();
    }
    Ok(())
}
