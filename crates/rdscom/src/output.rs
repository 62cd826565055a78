use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use rdscom_schema::Prototype;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
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
struct PongOutput {
    seq: u32,
    rtt_ms: u64,
    peer: String,
}

pub fn print_pong(seq: u32, rtt_ms: u64, peer: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PongOutput {
                seq,
                rtt_ms,
                peer: peer.to_string(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SEQ", "RTT (ms)", "PEER"])
                .add_row(vec![seq.to_string(), rtt_ms.to_string(), peer.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("pong seq={seq} rtt={rtt_ms}ms peer={peer}");
        }
    }
}

#[derive(Serialize)]
struct FieldOutput {
    name: String,
    kind: String,
    offset: usize,
    width: usize,
}

#[derive(Serialize)]
struct PrototypeOutput {
    id: u8,
    size: usize,
    fields: Vec<FieldOutput>,
}

pub fn print_prototype(proto: &Prototype, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PrototypeOutput {
                id: proto.identifier(),
                size: proto.size(),
                fields: proto
                    .fields()
                    .map(|(name, field)| FieldOutput {
                        name: name.to_string(),
                        kind: field.kind.to_string(),
                        offset: field.offset,
                        width: field.width(),
                    })
                    .collect(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "KIND", "OFFSET", "WIDTH"]);
            for (name, field) in proto.fields() {
                table.add_row(vec![
                    name.to_string(),
                    field.kind.to_string(),
                    field.offset.to_string(),
                    field.width().to_string(),
                ]);
            }
            println!("prototype {} ({} bytes)", proto.identifier(), proto.size());
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{proto}");
        }
    }
}

pub fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
