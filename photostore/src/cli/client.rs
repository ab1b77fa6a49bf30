use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use client::config::UNSET;
use client::{
    Config, Notify, NotifyKind, PendingFile, ProgressSink, SearchOutcome, Session, UploadOutcome,
};
use comfy_table::{presets::UTF8_HORIZONTAL_ONLY, Attribute, Cell, ContentArrangement, Table};
use kernel::Card;

/// Connection settings from CLI flags; anything absent falls back to the
/// `PHOTOSTORE_*` environment.
#[derive(Default)]
pub struct ConnectionParams {
    pub uri: Option<String>,
    pub region: Option<String>,
    pub bucket: Option<String>,
    pub api_key: Option<String>,
}

fn build_session(params: ConnectionParams) -> Session {
    let config = Config::from_env().with_overrides(
        params.region,
        params.bucket,
        params.uri,
        params.api_key,
    );
    Session::new(config, Arc::new(TerminalNotify))
}

struct TerminalNotify;

impl Notify for TerminalNotify {
    fn notify(&self, message: &str, kind: NotifyKind) {
        match kind {
            NotifyKind::Ok => println!("{message}"),
            NotifyKind::Err => eprintln!("{message}"),
        }
    }
}

struct TerminalProgress;

impl ProgressSink for TerminalProgress {
    fn report(&self, percent: u8) {
        print!("\ruploading {percent:>3}%");
        std::io::stdout().flush().unwrap_or_default();
        if percent == 100 {
            println!();
        }
    }
}

pub async fn upload(params: ConnectionParams, file: &str, labels: Option<&str>) {
    let path = PathBuf::from(file);
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file)
        .to_string();
    let mime = mime_guess::from_path(&path).first_raw().map(str::to_string);

    let data = match tokio::fs::read(&path).await {
        Ok(d) => Bytes::from(d),
        Err(e) => {
            eprintln!("no such file {file}: {e}");
            return;
        }
    };

    let mut session = build_session(params);
    session.select_file(PendingFile::new(name, mime, data));

    match session.upload(labels, Arc::new(TerminalProgress)).await {
        Ok(UploadOutcome::Completed) => println!("Uploaded successfully."),
        Ok(UploadOutcome::NoFile) => {}
        Err(e) => eprintln!("Upload failed: {e}"),
    }
}

pub async fn search(params: ConnectionParams, term: &str) {
    let session = build_session(params);

    match session.search(term).await {
        Ok(SearchOutcome::Empty | SearchOutcome::Superseded) => {}
        Ok(SearchOutcome::Hits(hits)) => {
            if hits.is_empty() {
                println!("No results.");
                return;
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_HORIZONTAL_ONLY)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_width(120)
                .set_header(vec![
                    Cell::new("Object").add_attribute(Attribute::Bold),
                    Cell::new("Bucket").add_attribute(Attribute::Bold),
                    Cell::new("URL").add_attribute(Attribute::Bold),
                ]);

            for hit in &hits {
                let card = Card::from(hit);
                table.add_row(vec![
                    Cell::new(card.primary_label),
                    Cell::new(card.secondary_label),
                    Cell::new(card.copyable_url),
                ]);
            }
            println!("{table}");
        }
        Err(e) => eprintln!("Search failed: {e}"),
    }
}

pub async fn show_config(params: ConnectionParams) {
    let session = build_session(params);
    let cfg = session.config();

    println!("Region     : {}", cfg.region.as_deref().unwrap_or(UNSET));
    println!("Bucket     : {}", cfg.bucket.as_deref().unwrap_or(UNSET));
    println!("API root   : {}", cfg.api_root.as_deref().unwrap_or(UNSET));
    println!("API key    : {}", cfg.masked_key());
    println!("Transport  : {}", session.mode());
}
