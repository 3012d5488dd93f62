//! Front-end configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All engine options from `tksm_core::Config` (flattened via serde)
//! - Where the definition sources live and how word files are named
//! - Display options (page length, wrap width, hint chart)
//!
//! # Example
//!
//! ```rust
//! use tksm::TksmConfig;
//!
//! let config = TksmConfig::from_toml_str("page_lines = 40\nmiss_glyph = '□'").unwrap();
//! assert_eq!(config.page_lines, 40);
//! assert_eq!(config.base().miss_glyph, '□');
//! ```

use crate::discovery;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tksm_core::mnemonic::COLUMN_HEADER;
use tksm_core::SourcePaths;

/// File looked up in the data directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "tksm.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TksmConfig {
    /// Base engine configuration (miss glyph, fallback key)
    #[serde(flatten)]
    pub base: tksm_core::Config,

    /// Directory holding every definition source
    pub data_dir: PathBuf,
    /// Romanization table; `.cin` or `.lime` by extension
    pub romanization_file: String,
    /// Mnemonic table; optional at runtime
    pub mnemonic_file: String,
    /// Word files are named `<prefix>*<extension>`
    pub word_prefix: String,
    pub word_extension: String,

    /// Lines per page when listing the phrase table
    pub page_lines: usize,
    /// Wrap width for word listings, in terminal columns
    pub display_width: usize,
    /// Chart shown on tab and after each commit
    pub hint_lines: Vec<String>,
    pub hint_after_commit: bool,
    /// Key-mapping guide printed once before the session starts
    pub startup_hint: Vec<String>,
}

impl Default for TksmConfig {
    fn default() -> Self {
        Self {
            base: tksm_core::Config::default(),
            data_dir: PathBuf::from("."),
            romanization_file: "pinyin.cin".into(),
            mnemonic_file: "tmp_tksm_words.txt".into(),
            word_prefix: "word".into(),
            word_extension: ".txt".into(),
            page_lines: 25,
            display_width: 78,
            hint_lines: default_hint_lines(),
            hint_after_commit: true,
            startup_hint: default_startup_hint(),
        }
    }
}

impl TksmConfig {
    /// Get a reference to the base config
    pub fn base(&self) -> &tksm_core::Config {
        &self.base
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load from a TOML file. Relative `data_dir` values are taken relative
    /// to the directory containing the file.
    pub fn load(path: &Path) -> Result<Self, tksm_core::Error> {
        let content = std::fs::read_to_string(path).map_err(|source| tksm_core::Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if config.data_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.data_dir = parent.join(&config.data_dir);
            }
        }
        Ok(config)
    }

    /// Pick the configuration for a run: an explicit file, else
    /// `tksm.toml` in `data_dir` if present, else defaults rooted at
    /// `data_dir`.
    pub fn discover(explicit: Option<&Path>, data_dir: &Path) -> Result<Self, tksm_core::Error> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = data_dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Self::load(&candidate);
        }
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            ..Self::default()
        })
    }

    pub fn romanization_path(&self) -> PathBuf {
        self.data_dir.join(&self.romanization_file)
    }

    pub fn mnemonic_path(&self) -> PathBuf {
        self.data_dir.join(&self.mnemonic_file)
    }

    /// Resolve every source location, listing word files in name order.
    pub fn source_paths(&self) -> std::io::Result<SourcePaths> {
        let word_files =
            discovery::word_files(&self.data_dir, &self.word_prefix, &self.word_extension)?;
        Ok(SourcePaths {
            romanization: self.romanization_path(),
            word_files,
            mnemonic: Some(self.mnemonic_path()),
        })
    }
}

/// The column header followed by the zhuyin keyboard chart.
pub fn default_hint_lines() -> Vec<String> {
    vec![
        COLUMN_HEADER.trim_start_matches("## ").to_string(),
        "ㄘㄅㄒㄉㄧㄈㄍㄏㄞㄐㄎㄌㄇㄋㄡㄆ　ㄖㄙㄊㄩㄑㄠㄨㄚㄗ".into(),
        "ㄟ　ㄕ　ㄝ　ㄜㄛ　ㄓㄤㄥㄢㄣ　　          ㄔ".into(),
        "　　  ˊ　 ˇ　　   ˋ 　ㄦ　　　      ˙　".into(),
    ]
}

/// How zhuyin symbols map onto letters, and where the tones sit.
pub fn default_startup_hint() -> Vec<String> {
    [
        "提示：許氏注音對應規則 第一類：字母對應 (1) 字音相似（發音類似）",
        "- ㄅ → B, ㄆ → P, ㄇ → M, ㄈ → F, ㄉ → D, ㄊ → T, ㄋ → N, ㄌ → L",
        "- ㄍ → G, ㄎ → K, ㄏ → H, ㄐ → J, ㄑ → Q, ㄒ → X, ㄖ → R, ㄗ → Z",
        "- ㄘ → C, ㄙ → S, ㄝ → E, ㄞ → A, ㄟ → E, ㄡ → O, ㄣ → N, ㄧ → I",
        "",
        "(2) 字形相似（形狀類似）",
        "- ㄠ ← W (逆時針轉90度), ㄑ ← V (逆時針轉90度), ㄢ ← M (上下合併)",
        "- ㄋ ← N (逆時針轉90度), ㄤ ← K (逆時針轉45度), ㄥ ← L (字形相似)",
        "- ㄦ ← L (ㄦ右半邊與L相似), ㄚ ← Y (字形相似), ㄨ ← X (字形相似)",
        "- ㄩ ← U (字形相似)",
        "",
        "第二類：鍵盤排列記憶",
        "- ㄗ → Z, ㄘ → C, ㄙ → S (依發音)",
        "- ㄐ → J, ㄑ → Q, ㄒ → X (音標相似)",
        "- ㄜ → G, ㄛ → H (手順方便)",
        "",
        "【聲調鍵】- 一聲 → 空白鍵, 二聲 → D, 三聲 → F, 四聲 → J, 輕聲 → S",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
