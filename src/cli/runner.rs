//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::decode::JsonDecoder;
use crate::error::{Error, Result};
use crate::incremental::ReplicationState;
use crate::pagination::{HttpPageSource, PaginationDriver, RequestParameterAssembler};
use crate::state::{HighWaterMark, StateManager};
use crate::streams::{catalog, find_stream, StreamDefinition};
use futures::StreamExt;
use serde_json::{json, Value};
use std::io::Write;
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of a `read` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadSummary {
    /// Stream that was read
    pub stream: String,
    /// Records emitted
    pub records: usize,
    /// Whether every page was consumed
    pub complete: bool,
    /// Bookmark after the run
    pub bookmark: Option<ReplicationState>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing messages to stdout
    pub async fn run(&self) -> Result<()> {
        let mut stdout = std::io::stdout();
        match &self.cli.command {
            Commands::Discover => self.discover(&mut stdout),
            Commands::Read {
                stream,
                max_records,
            } => self
                .read(&mut stdout, stream, *max_records)
                .await
                .map(|_| ()),
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<TapConfig> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json_str(json_str);
        }

        match &self.cli.config {
            Some(path) => TapConfig::from_file(path),
            None => Err(Error::config(
                "Config not specified (use --config or --config-json)",
            )),
        }
    }

    /// Load state
    fn load_state(&self) -> Result<StateManager> {
        // Inline state takes precedence
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Print the stream catalog
    pub fn discover<W: Write>(&self, out: &mut W) -> Result<()> {
        let streams: Vec<Value> = catalog().iter().map(catalog_entry).collect();
        self.output_message(out, &json!({ "streams": streams }))
    }

    /// Extract one stream, emitting a RECORD per record and a final STATE.
    ///
    /// The bookmark only moves when every page was consumed. Stopping early
    /// via `max_records` or failing part way leaves the stored state untouched.
    pub async fn read<W: Write>(
        &self,
        out: &mut W,
        stream_name: &str,
        max_records: Option<usize>,
    ) -> Result<ReadSummary> {
        let sync_start = Instant::now();
        let config = self.load_config()?;
        let state = self.load_state()?;
        let stream = find_stream(stream_name)?;

        let start = match &stream.replication_key {
            Some(key) => state
                .replication_state(&stream.name, key)
                .await?
                .or(config.start_date),
            None => None,
        };

        let records_path = config
            .records_path
            .clone()
            .unwrap_or_else(|| stream.records_path.clone());
        let source = HttpPageSource::with_decoder(
            config.build_client()?,
            JsonDecoder::with_path(records_path),
        );

        let mut assembler = RequestParameterAssembler::new(config.page_size);
        if let Some(key) = &stream.replication_key {
            assembler = assembler.with_replication_key(key);
        }

        let mut mark = stream
            .replication_key
            .as_ref()
            .map(|key| HighWaterMark::new(key, start));
        let mut records = PaginationDriver::new(source, stream.path.clone(), assembler)
            .with_replication_state(start)
            .into_records();

        info!(stream = %stream.name, since = ?start.map(|s| s.to_string()), "Starting sync");

        let mut count = 0usize;
        let mut complete = true;
        loop {
            if max_records.is_some_and(|max| count >= max) {
                info!(stream = %stream.name, records = count, "Record limit reached");
                complete = false;
                break;
            }

            let Some(record) = records.next().await else {
                break;
            };
            let record = record?;

            if let Some(mark) = mark.as_mut() {
                mark.observe(&record);
            }
            self.output_message(
                out,
                &json!({
                    "type": "RECORD",
                    "stream": stream.name,
                    "record": record,
                }),
            )?;
            count += 1;
        }
        drop(records);

        let mut bookmark = start;
        if let Some(mark) = mark.filter(|_| complete) {
            if mark.unparsable() > 0 {
                warn!(
                    stream = %stream.name,
                    key = mark.key(),
                    skipped = mark.unparsable(),
                    "Records without a usable replication value"
                );
            }
            if let Some(value) = mark.value().filter(|value| Some(*value) != start) {
                state.set_bookmark(&stream.name, mark.key(), &value).await?;
                bookmark = Some(value);
            }
        }

        let final_state = serde_json::to_value(state.snapshot().await)?;
        self.output_message(out, &json!({ "type": "STATE", "value": final_state }))?;

        info!(
            stream = %stream.name,
            records = count,
            complete,
            duration_ms = sync_start.elapsed().as_millis() as u64,
            "Sync finished"
        );

        Ok(ReadSummary {
            stream: stream.name,
            records: count,
            complete,
            bookmark,
        })
    }

    /// Output a message
    fn output_message<W: Write>(&self, out: &mut W, msg: &Value) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        };
        writeln!(out, "{line}")?;
        Ok(())
    }
}

/// Singer catalog entry for a stream
fn catalog_entry(stream: &StreamDefinition) -> Value {
    let method = if stream.replication_key.is_some() {
        "INCREMENTAL"
    } else {
        "FULL_TABLE"
    };
    json!({
        "tap_stream_id": stream.name,
        "stream": stream.name,
        "path": stream.path,
        "key_properties": stream.primary_keys,
        "replication_key": stream.replication_key,
        "replication_method": method,
        "sync_mode": stream.sync_mode(),
    })
}
