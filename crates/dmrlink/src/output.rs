use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use dmrlink_dmr::Emb;
use dmrlink_frame::{signature_name, CallType, Frame, FrameType};
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

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EmbOutput {
    pub codeword: String,
    pub color_code: u8,
    pub lcss: String,
}

impl EmbOutput {
    pub fn new(emb: &Emb) -> Self {
        Self {
            codeword: format!("0x{:04X}", emb.encode()),
            color_code: emb.color_code(),
            lcss: emb.lcss().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FrameOutput {
    pub signature: String,
    pub sequence: u8,
    pub src_id: u32,
    pub dst_id: u32,
    pub repeater_id: u32,
    pub slot: u8,
    pub call_type: &'static str,
    pub frame_type: &'static str,
    pub data_type: u8,
    pub stream_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emb: Option<EmbOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emb_error: Option<String>,
    pub payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl FrameOutput {
    pub fn new(frame: &Frame) -> Self {
        let (emb, emb_error) = match frame.emb() {
            Some(Ok(emb)) => (Some(EmbOutput::new(&emb)), None),
            Some(Err(err)) => (None, Some(err.to_string())),
            None => (None, None),
        };
        Self {
            signature: signature_name(&frame.signature).to_string(),
            sequence: frame.sequence,
            src_id: frame.src_id,
            dst_id: frame.dst_id,
            repeater_id: frame.repeater_id,
            slot: frame.slot(),
            call_type: call_type_name(frame.call_type()),
            frame_type: frame_type_name(frame.frame_type()),
            data_type: frame.data_type(),
            stream_id: format!("{:08x}", frame.stream_id),
            emb,
            emb_error,
            payload: hex::encode(frame.dmr),
            timestamp: None,
        }
    }

    /// Stamp with the current time, for frames received live.
    pub fn received_now(mut self) -> Self {
        self.timestamp = Some(now_unix_seconds());
        self
    }

    fn emb_text(&self) -> String {
        match (&self.emb, &self.emb_error) {
            (Some(emb), _) => format!("cc={} lcss={}", emb.color_code, emb.lcss),
            (None, Some(err)) => format!("invalid ({err})"),
            (None, None) => "-".to_string(),
        }
    }
}

pub fn print_frame(out: &FrameOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "SLOT", "SEQ", "SRC", "DST", "CALL", "TYPE", "DATA", "STREAM", "EMB",
                ])
                .add_row(vec![
                    out.slot.to_string(),
                    out.sequence.to_string(),
                    out.src_id.to_string(),
                    out.dst_id.to_string(),
                    out.call_type.to_string(),
                    out.frame_type.to_string(),
                    out.data_type.to_string(),
                    out.stream_id.clone(),
                    out.emb_text(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "slot={} seq={} {} -> {} call={} type={} data={} stream={} emb={}",
                out.slot,
                out.sequence,
                out.src_id,
                out.dst_id,
                out.call_type,
                out.frame_type,
                out.data_type,
                out.stream_id,
                out.emb_text()
            );
        }
        OutputFormat::Raw => {
            let payload = hex::decode(&out.payload).unwrap_or_default();
            print_raw(&payload);
        }
    }
}

pub fn print_emb(out: &EmbOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CODEWORD", "COLOR CODE", "LCSS"])
                .add_row(vec![
                    out.codeword.clone(),
                    out.color_code.to_string(),
                    out.lcss.clone(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "codeword={} color_code={} lcss={}",
                out.codeword, out.color_code, out.lcss
            );
        }
        OutputFormat::Raw => println!("{}", out.codeword),
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn call_type_name(call_type: CallType) -> &'static str {
    match call_type {
        CallType::Group => "group",
        CallType::Unit => "unit",
    }
}

pub fn frame_type_name(frame_type: FrameType) -> &'static str {
    match frame_type {
        FrameType::Voice => "voice",
        FrameType::VoiceSync => "voice_sync",
        FrameType::DataSync => "data_sync",
        FrameType::Unused => "unused",
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use dmrlink_dmr::Lcss;
    use dmrlink_frame::compose_flags;

    use super::*;

    #[test]
    fn frame_output_describes_flags() {
        let flags = compose_flags(2, CallType::Unit, FrameType::DataSync, 1);
        let frame = Frame::new([0xAB; 33])
            .with_source(2_042_214)
            .with_destination(9)
            .with_flags(flags)
            .with_stream(0xBEEF);
        let out = FrameOutput::new(&frame);

        assert_eq!(out.signature, "DMRD");
        assert_eq!(out.slot, 2);
        assert_eq!(out.call_type, "unit");
        assert_eq!(out.frame_type, "data_sync");
        assert_eq!(out.stream_id, "0000beef");
        assert!(out.emb.is_none());
        assert!(out.emb_error.is_none());
        assert_eq!(out.payload.len(), 66);

        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["src_id"], 2_042_214);
        assert!(json.get("emb").is_none());
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn voice_frame_reports_emb_error() {
        let frame = Frame::new([0xFF; 33]);
        let out = FrameOutput::new(&frame);
        assert_eq!(out.frame_type, "voice");
        assert!(out.emb_error.is_some());
        assert!(out.emb_text().starts_with("invalid"));
    }

    #[test]
    fn emb_output_formats_codeword() {
        let out = EmbOutput::new(&Emb::new(1, Lcss::First));
        assert_eq!(
            out,
            EmbOutput {
                codeword: "0x1391".to_string(),
                color_code: 1,
                lcss: "first".to_string(),
            }
        );
    }
}
