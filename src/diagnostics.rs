//! デバッグ用の履歴ダンプ
//!
//! エンジンの動作には関与しない。対話的なデバッグのためのテキスト表示と、
//! JSONで書き出すためのスナップショットを提供する。

use crate::history::UndoHistory;
use crate::record::{UndoAction, UndoRecord};
use serde::Serialize;
use std::fmt::Write as _;

/// レコード1件を1行で表示
pub fn describe_record(record: &UndoRecord) -> String {
    let mut line = match record.action() {
        UndoAction::InsertChar { count, ch: b'\n' } => format!("Char: NEWLINE, n = {count}"),
        UndoAction::InsertChar { count, ch } => format!("Char: '{}', n = {count}", *ch as char),
        UndoAction::InsertString { bytes } => format!("String: '{}'", escape(bytes)),
        UndoAction::Move => "Move".to_string(),
        UndoAction::Delete { count } => format!("Delete: {count} characters"),
    };
    if let Some(location) = record.position() {
        let _ = write!(line, ", {location}");
    }
    line
}

/// 履歴全体を古い順に番号付きで表示
pub fn dump_history(history: &UndoHistory) -> String {
    let mut out = String::new();
    for (level, group) in history.iter().enumerate() {
        let _ = writeln!(out, "{}:", level + 1);
        for record in group.records() {
            let _ = writeln!(out, "  {}", describe_record(record));
        }
    }
    out
}

fn escape(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for &byte in bytes {
        if byte == b'\n' {
            text.push_str("\\n");
        } else {
            text.push(byte as char);
        }
    }
    text
}

/// 履歴のJSON出力用スナップショット
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub capacity: usize,
    pub groups: Vec<GroupSnapshot>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnapshot {
    pub saved_modified: bool,
    pub records: Vec<RecordSnapshot>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordSnapshot {
    pub kind: &'static str,
    pub line: Option<usize>,
    pub offset: Option<usize>,
    pub count: Option<usize>,
    pub text: Option<String>,
}

impl RecordSnapshot {
    fn from_record(record: &UndoRecord) -> Self {
        let (kind, count, text) = match record.action() {
            UndoAction::Move => ("move", None, None),
            UndoAction::InsertChar { count, ch } => {
                ("insertChar", Some(*count), Some((*ch as char).to_string()))
            }
            UndoAction::InsertString { bytes } => (
                "insertString",
                Some(bytes.len()),
                Some(String::from_utf8_lossy(bytes).into_owned()),
            ),
            UndoAction::Delete { count } => ("delete", Some(*count), None),
        };
        Self {
            kind,
            line: record.position().map(|location| location.line),
            offset: record.position().map(|location| location.offset),
            count,
            text,
        }
    }
}

impl HistorySnapshot {
    pub fn from_history(history: &UndoHistory) -> Self {
        Self {
            capacity: history.capacity(),
            groups: history
                .iter()
                .map(|group| GroupSnapshot {
                    saved_modified: group.saved_modified(),
                    records: group.records().iter().map(RecordSnapshot::from_record).collect(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
