//! In-memory libpcap-format capture of every delivered packet, flushed to
//! a file on `Terminate` (matches `loggers/pcap.go` and `pcap/pcap.go`).
//!
//! Reference for the file format:
//! <https://wiki.wireshark.org/Development/LibpcapFileFormat>

use mcsim_common::{Event, EventKind};
use mcsim_model::Logger;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PcapWriteError {
    #[error("failed to write pcap capture to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

const MAGIC_NUMBER: u32 = 0xa1b2c3d4;
const VERSION_MAJOR: u16 = 0x02;
const VERSION_MINOR: u16 = 0x04;
const SNAPLEN: u32 = 0xffff;
/// Ethernet, the same "ethernet-ish" link type the original used for its
/// made-up BLE source/destination encoding rather than a real BLE linktype.
const LINKTYPE_ETHERNET: u32 = 0x01;

pub struct PcapCaptureLogger {
    path: PathBuf,
    buffer: Vec<u8>,
    base_unix_time: u64,
}

impl PcapCaptureLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PcapCaptureLogger { path: path.into(), buffer: Vec::new(), base_unix_time: 0 }
    }

    fn write_global_header(&mut self) {
        self.buffer.extend_from_slice(&MAGIC_NUMBER.to_le_bytes());
        self.buffer.extend_from_slice(&VERSION_MAJOR.to_le_bytes());
        self.buffer.extend_from_slice(&VERSION_MINOR.to_le_bytes());
        self.buffer.extend_from_slice(&0u32.to_le_bytes());
        self.buffer.extend_from_slice(&0u32.to_le_bytes());
        self.buffer.extend_from_slice(&SNAPLEN.to_le_bytes());
        self.buffer.extend_from_slice(&LINKTYPE_ETHERNET.to_le_bytes());
    }

    /// Appends one packet record: a 16-byte libpcap header, a 12-byte
    /// "ethernet-ish" src/dst/protocol prologue built from the low 6 bytes
    /// of each `NodeId`, then the raw packet bytes.
    fn add_packet(&mut self, packet: &[u8], sim_elapsed_us: u64, dst_id: i64, src_id: i64) {
        let dst = (dst_id as u64).to_le_bytes();
        let src = (src_id as u64).to_le_bytes();

        let mut content = Vec::with_capacity(12 + packet.len());
        content.extend_from_slice(&dst[0..6]);
        content.extend_from_slice(&src[0..6]);
        content.extend_from_slice(&0u16.to_le_bytes());
        content.extend_from_slice(packet);

        let unix_secs = self.base_unix_time + sim_elapsed_us / 1_000_000;
        let micros = (sim_elapsed_us % 1_000_000) as u32;

        self.buffer.extend_from_slice(&(unix_secs as u32).to_le_bytes());
        self.buffer.extend_from_slice(&micros.to_le_bytes());
        self.buffer.extend_from_slice(&(content.len() as u32).to_le_bytes());
        self.buffer.extend_from_slice(&(content.len() as u32).to_le_bytes());
        self.buffer.extend_from_slice(&content);
    }

    pub fn write_file(&self) -> Result<(), PcapWriteError> {
        let mut path = self.path.clone();
        if path.extension().is_none() {
            path.set_extension("pcap");
        }
        std::fs::write(&path, &self.buffer).map_err(|source| PcapWriteError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

impl Logger for PcapCaptureLogger {
    fn init(&mut self) {
        self.buffer.clear();
        self.write_global_header();
    }

    fn new_event(&mut self, event: &Event) {
        if let EventKind::Receive(payload) = &event.kind {
            let dst = payload.target.0 as i64;
            let src = payload.origin_node_id.0;
            self.add_packet(&payload.packet, event.time.as_micros() as u64, dst, src);
        }
        if let EventKind::Terminate { .. } = &event.kind {
            if let Err(e) = self.write_file() {
                tracing::warn!(target: "mcsim::pcap", "failed to write pcap capture: {e}");
            }
        }
    }

    fn log(&mut self, _msg: &str) {}
}
