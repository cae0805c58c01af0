//! undo設定
//!
//! 保持するグループ数の上限などを扱う。ファイルはJSON形式。

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 保持するundoグループ数の既定値
pub const DEFAULT_MAX_GROUPS: usize = 100;

/// undoエンジンの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UndoConfig {
    /// バッファごとに保持するグループ数の上限
    pub max_groups: usize,
    /// 新しいコマンドの最初の削除レコードを直前のコマンドの末尾と結合するか
    ///
    /// 有効にすると連続した文字入力が1回のundoでまとめて戻る。
    pub coalesce_across_commands: bool,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            max_groups: DEFAULT_MAX_GROUPS,
            coalesce_across_commands: false,
        }
    }
}

impl UndoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// グループ数の上限を変更
    pub fn with_max_groups(mut self, max_groups: usize) -> Self {
        self.max_groups = max_groups;
        self
    }

    /// コマンドをまたいだ削除の結合を切り替える
    pub fn with_coalesce_across_commands(mut self, enabled: bool) -> Self {
        self.coalesce_across_commands = enabled;
        self
    }

    /// 値の妥当性を検査
    pub fn validate(&self) -> Result<()> {
        if self.max_groups == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_groups".to_string(),
                value: self.max_groups.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// JSON文字列から読み込む
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: UndoConfig =
            serde_json::from_str(source).map_err(|err| ConfigError::InvalidValue {
                key: "<document>".to_string(),
                value: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// JSONファイルから読み込む
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|_| ConfigError::InvalidFile {
            path: path.display().to_string(),
        })?;
        let config = Self::from_json_str(&source)?;
        log::debug!("loaded undo config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
