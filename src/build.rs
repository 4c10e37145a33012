//! The build pipeline
//!
//! enumerate → (front matter → summary → compat → spec syntax) per document →
//! fold into the output tree → write. Documents are processed one at a time
//! and the tree is threaded through the fold as a plain value.

use crate::config::BuildConfig;
use crate::core::{
    extract_summary, FeatureRecord, FrontMatter, OutputTree, SkipReason,
};
use crate::error::Result;
use crate::io::{read_to_string, Datasets, FileResolver, OutputWriter};
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Documents enumerated under the content root
    pub documents: usize,
    /// Records merged into the tree
    pub records: usize,
    /// Skipped documents by [`SkipReason::label`]
    pub skipped: BTreeMap<&'static str, usize>,
}

impl BuildReport {
    /// Documents skipped for any reason
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    fn skip(&mut self, reason: &SkipReason) {
        *self.skipped.entry(reason.label()).or_default() += 1;
    }
}

/// Turn one document into a record, or say why it does not make one
pub fn build_record(
    content: &str,
    config: &BuildConfig,
    datasets: &Datasets,
) -> std::result::Result<FeatureRecord, SkipReason> {
    let (front_matter, body_start) = FrontMatter::parse(content, &config.allowed_page_types)?;
    if let Err(e) = OutputTree::check_path(&front_matter.browser_compat) {
        return Err(SkipReason::Unmergeable(e.to_string()));
    }

    let path = front_matter.browser_compat;
    Ok(FeatureRecord {
        page_type: Some(front_matter.page_type),
        mdn_url: front_matter.slug.as_deref().map(|slug| config.docs_url(slug)),
        spec_url: datasets.compat.spec_url(&path),
        compat: datasets.compat.resolve(&path),
        spec_data: datasets.specs.resolve(&path, front_matter.page_type),
        ..FeatureRecord::new(
            path.clone(),
            front_matter.title,
            extract_summary(content, body_start),
        )
    })
}

/// Read and fold every document under the content root
pub fn collect(config: &BuildConfig, datasets: &Datasets) -> Result<(OutputTree, BuildReport)> {
    let resolver = FileResolver::new(&config.include, &config.ignore)?;
    let files = resolver.resolve(&config.content_dir())?;
    info!("found {} documents", files.len());

    let mut report = BuildReport {
        documents: files.len(),
        ..Default::default()
    };
    let mut tree = OutputTree::new();

    for file in &files {
        let content = read_to_string(&file.path)?;
        match build_record(&content, config, datasets) {
            Ok(record) => {
                debug!("{} -> {}", file.relative, record.path);
                tree = tree.merge(&record)?;
                report.records += 1;
            }
            Err(reason @ SkipReason::Unmergeable(_)) => {
                warn!("skipping {}: {}", file.relative, reason);
                report.skip(&reason);
            }
            Err(reason) => {
                debug!("skipping {}: {}", file.relative, reason);
                report.skip(&reason);
            }
        }
    }

    Ok((tree, report))
}

/// One complete build run
pub struct Builder {
    config: BuildConfig,
}

impl Builder {
    /// A builder for one run over `config`
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// The configuration this run uses
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Load, collect, write. Nothing is written unless collection succeeded.
    pub fn run(&self) -> Result<BuildReport> {
        let datasets = Datasets::load(&self.config)?;
        let (tree, report) = collect(&self.config, &datasets)?;

        let writer = OutputWriter::new(&self.config);
        writer.write_tree(&tree)?;
        writer.mirror_descriptor()?;
        writer.copy_files()?;

        info!(
            "{} documents, {} records, {} skipped",
            report.documents,
            report.records,
            report.skipped_total()
        );
        Ok(report)
    }
}
