//! line-undo - 行指向テキストエディタのundoエンジン
//!
//! コマンドごとに原子的な変更をグループとして記録し、
//! 部分列を逆順・部分列内を正順で再生してコマンドを取り消す。

// コアモジュール
pub mod config;
pub mod error;

// データ層
pub mod group;
pub mod history;
pub mod record;

// 編集層
pub mod context;
pub mod recorder;
pub mod replayer;

// デバッグ支援
pub mod diagnostics;

#[cfg(test)]
mod test_support;

// 公開API
pub use config::{UndoConfig, DEFAULT_MAX_GROUPS};
pub use context::{BufferPos, BufferView, EditPrimitives};
pub use error::{ConfigError, ErrorLevel, Result, UndoError};
pub use group::UndoGroup;
pub use history::UndoHistory;
pub use record::{Edit, Location, UndoAction, UndoKind, UndoRecord};
pub use recorder::Recorder;
pub use replayer::{replay_group, undo_step, ReplayStats, UndoManager};
