use super::{ExportError, ResultsDocument};
use crate::analytics::aggregator::WatchTimeStats;
use crate::config::Config;
use std::fs;
use std::path::Path;
use tracing::info;

/// JSON形式エクスポーター（インデント付き）
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(&self, document: &ResultsDocument) -> Result<Vec<u8>, ExportError> {
        Ok(serde_json::to_vec_pretty(document)?)
    }

    pub fn write_to_file(
        &self,
        document: &ResultsDocument,
        path: impl AsRef<Path>,
    ) -> Result<(), ExportError> {
        let path = path.as_ref();
        let bytes = self.export(document)?;
        fs::write(path, bytes).map_err(|source| ExportError::FileAccess {
            path: path.display().to_string(),
            source,
        })
    }
}

/// 統計結果をJSONファイルに保存
pub fn save_results(
    stats: &WatchTimeStats,
    config: &Config,
    output_file: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let document = ResultsDocument::new(stats, config, chrono::Local::now());
    JsonExporter::new().write_to_file(&document, output_file.as_ref())?;

    info!("Results saved to: {}", output_file.as_ref().display());
    Ok(())
}
