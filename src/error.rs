//! エラーハンドリング
//!
//! undoエンジン全体で使用するエラー型を定義する。
//! どのエラーもコマンドハンドラ側で回復可能であり、プロセスを終了させるものはない。

use thiserror::Error;

/// undoエンジンのエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UndoError {
    /// 履歴が空
    #[error("undo stack is empty")]
    NothingToUndo,

    /// 文字列ペイロードの確保に失敗
    #[error("Out of memory in undo! ({requested} bytes)")]
    OutOfMemory { requested: usize },

    /// 未知のレコード種別
    #[error("Unimplemented undo type {0}")]
    UnknownKind(u8),

    /// カーソル移動に失敗
    #[error("Cannot move to line {line}, offset {offset}: {reason}")]
    Navigation {
        line: usize,
        offset: usize,
        reason: String,
    },

    /// 編集プリミティブの失敗
    #[error("Edit error: {0}")]
    Edit(String),

    /// 再生中に一部のステップが失敗
    #[error("undo replay incomplete: {failed} of {total} steps failed")]
    ReplayIncomplete { failed: usize, total: usize },

    /// 設定エラー
    #[error("Configuration error")]
    Config(#[from] ConfigError),
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file: {path}")]
    InvalidFile { path: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
}

impl UndoError {
    /// メッセージ行に表示する際の重要度
    pub fn level(&self) -> ErrorLevel {
        match self {
            UndoError::NothingToUndo => ErrorLevel::Info,
            UndoError::Navigation { .. } | UndoError::ReplayIncomplete { .. } => {
                ErrorLevel::Warning
            }
            UndoError::OutOfMemory { .. }
            | UndoError::UnknownKind(_)
            | UndoError::Edit(_)
            | UndoError::Config(_) => ErrorLevel::Error,
        }
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, UndoError>;
