//! Main `Merger` struct and public API.

use std::path::Path;

use crate::error::Result;
use crate::input::{Parser, ParserConfig, RawSource, Source, SourceMetadata, WorkbookReader};
use crate::merge::{AppendMerger, JoinMerger, JoinSpec, MergedResult};
use crate::schema::ProvenanceConfig;

/// Configuration for a [`Merger`].
#[derive(Debug, Clone, Default)]
pub struct MergeConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Provenance column settings for the append strategy.
    pub provenance: ProvenanceConfig,
}

/// Ingests sources and merges them with either strategy.
///
/// A `Merger` holds configuration only. Every call builds its results
/// from scratch and never mutates the sources it is given.
#[derive(Clone)]
pub struct Merger {
    config: MergeConfig,
    parser: Parser,
}

impl Merger {
    /// Create a merger with default configuration.
    pub fn new() -> Self {
        Self::with_config(MergeConfig::default())
    }

    /// Create a merger with custom configuration.
    pub fn with_config(config: MergeConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self { config, parser }
    }

    /// Enable spreadsheet sources.
    pub fn with_workbook_reader(mut self, reader: impl WorkbookReader + 'static) -> Self {
        self.parser = self.parser.with_workbook_reader(reader);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// The parser used for ingestion.
    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Ingest raw sources concurrently, in order.
    pub fn ingest(&self, raws: &[RawSource]) -> Result<Vec<Source>> {
        self.parser.ingest_all(raws)
    }

    /// Read and ingest files concurrently, in order.
    pub fn load_files<P>(&self, paths: &[P]) -> Result<Vec<(Source, SourceMetadata)>>
    where
        P: AsRef<Path> + Sync,
    {
        self.parser.parse_files(paths)
    }

    /// Stack rows of already ingested sources.
    pub fn append(&self, sources: &[Source]) -> MergedResult {
        AppendMerger::new(self.config.provenance.clone()).merge(sources)
    }

    /// Join already ingested sources.
    pub fn join(&self, sources: &[Source], spec: &JoinSpec) -> Result<MergedResult> {
        JoinMerger::new(spec.clone()).merge(sources)
    }

    /// Ingest raw sources, then stack their rows.
    pub fn append_raw(&self, raws: &[RawSource]) -> Result<MergedResult> {
        let sources = self.ingest(raws)?;
        Ok(self.append(&sources))
    }

    /// Ingest raw sources, then join them.
    pub fn join_raw(&self, raws: &[RawSource], spec: &JoinSpec) -> Result<MergedResult> {
        let sources = self.ingest(raws)?;
        self.join(&sources, spec)
    }

    /// Read files, then stack their rows.
    pub fn append_files<P>(&self, paths: &[P]) -> Result<MergedResult>
    where
        P: AsRef<Path> + Sync,
    {
        let sources = sources_only(self.load_files(paths)?);
        Ok(self.append(&sources))
    }

    /// Read files, then join them.
    pub fn join_files<P>(&self, paths: &[P], spec: &JoinSpec) -> Result<MergedResult>
    where
        P: AsRef<Path> + Sync,
    {
        let sources = sources_only(self.load_files(paths)?);
        self.join(&sources, spec)
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

fn sources_only(loaded: Vec<(Source, SourceMetadata)>) -> Vec<Source> {
    loaded.into_iter().map(|(source, _)| source).collect()
}

/// Stack the rows of `sources` under a unified header, optionally tagging
/// each row with its source name in a `Source File` column.
pub fn merge_append(sources: &[Source], include_provenance_column: bool) -> MergedResult {
    let provenance = if include_provenance_column {
        ProvenanceConfig::default()
    } else {
        ProvenanceConfig::disabled()
    };
    AppendMerger::new(provenance).merge(sources)
}

/// Join `sources` on `spec.key_column`.
pub fn merge_join(sources: &[Source], spec: &JoinSpec) -> Result<MergedResult> {
    JoinMerger::new(spec.clone()).merge(sources)
}
