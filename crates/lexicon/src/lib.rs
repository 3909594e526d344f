use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parley_core::{SymbolTable, SymbolTableConfig, TemplateSet};
use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone, Default, Serialize)]
pub struct LexiconStats {
    pub packs_loaded: usize,
    pub entries: usize,
    pub categories: usize,
    pub sources: Vec<String>,
}

/// Symbol table plus where its contents came from.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub symbols: SymbolTable,
    pub stats: LexiconStats,
}

impl Lexicon {
    pub fn builtin() -> Self {
        Self::from_table(SymbolTable::builtin(), Vec::new())
    }

    /// Built-in table with every `*.json` pack under `root` layered on top,
    /// in sorted path order.
    pub fn from_dir(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut symbols = SymbolTable::builtin();
        let mut sources = Vec::new();

        for path in pack_paths(root)? {
            let pack = read_pack(&path)?;
            debug!(
                pack = %path.display(),
                entries = pack.entries.len(),
                categories = pack.categories.len(),
                "merging lexicon pack"
            );
            symbols
                .merge(pack)
                .with_context(|| format!("invalid lexicon pack: {}", path.display()))?;

            sources.push(
                path.strip_prefix(root)
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|_| path.to_string_lossy().to_string()),
            );
        }

        Ok(Self::from_table(symbols, sources))
    }

    fn from_table(symbols: SymbolTable, sources: Vec<String>) -> Self {
        let stats = LexiconStats {
            packs_loaded: sources.len(),
            entries: symbols.len(),
            categories: symbols.category_count(),
            sources,
        };
        Self { symbols, stats }
    }
}

pub fn load_templates(path: impl AsRef<Path>) -> Result<TemplateSet> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed reading template file: {}", path.display()))?;
    TemplateSet::from_json_str(&raw)
        .with_context(|| format!("invalid template file: {}", path.display()))
}

fn pack_paths(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("lexicon directory not found: {}", root.display());
    }

    let mut paths = WalkDir::new(root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some("json"))
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();
    paths.sort();
    Ok(paths)
}

fn read_pack(path: &Path) -> Result<SymbolTableConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed reading lexicon pack: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("malformed lexicon pack: {}", path.display()))
}
