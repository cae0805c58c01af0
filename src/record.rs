//! undoレコード
//!
//! 1回の編集で起きた原子的な変化を、元に戻すための操作として表現する。
//! 文字を削除したコマンドは「その文字を挿入する」レコードを、
//! 文字を挿入したコマンドは「その文字数を削除する」レコードを残す。

use crate::error::{Result, UndoError};
use std::fmt;

/// バッファ内の位置（0ベースの行番号と行内オフセット）
///
/// 位置を持たないレコードは `Option<Location>` の `None` で表す。
/// 行とオフセットは常に揃って設定される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub line: usize,
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, offset {}", self.line, self.offset)
    }
}

/// レコード種別のタグ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UndoKind {
    Move = 1,
    InsertChar = 2,
    InsertString = 3,
    Delete = 4,
}

impl UndoKind {
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for UndoKind {
    type Error = UndoError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            1 => Ok(UndoKind::Move),
            2 => Ok(UndoKind::InsertChar),
            3 => Ok(UndoKind::InsertString),
            4 => Ok(UndoKind::Delete),
            other => Err(UndoError::UnknownKind(other)),
        }
    }
}

/// 再生時に行う逆操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoAction {
    /// カーソル位置の復元のみ
    Move,
    /// `ch` を `count` 個挿入（改行なら改行を `count` 個）
    InsertChar { count: usize, ch: u8 },
    /// 保存したバイト列を挿入（常に2バイト以上）
    InsertString { bytes: Box<[u8]> },
    /// カーソルから前方へ `count` 文字削除
    Delete { count: usize },
}

impl UndoAction {
    pub fn kind(&self) -> UndoKind {
        match self {
            UndoAction::Move => UndoKind::Move,
            UndoAction::InsertChar { .. } => UndoKind::InsertChar,
            UndoAction::InsertString { .. } => UndoKind::InsertString,
            UndoAction::Delete { .. } => UndoKind::Delete,
        }
    }
}

/// 位置情報付きの単一レコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRecord {
    position: Option<Location>,
    action: UndoAction,
}

impl UndoRecord {
    pub(crate) fn new(position: Option<Location>, action: UndoAction) -> Self {
        Self { position, action }
    }

    pub fn position(&self) -> Option<Location> {
        self.position
    }

    pub fn action(&self) -> &UndoAction {
        &self.action
    }

    pub fn kind(&self) -> UndoKind {
        self.action.kind()
    }

    /// 直後に来た削除を吸収できるなら件数を加算して `true` を返す
    ///
    /// 同じ行で `offset + count` が新しい削除の開始位置と一致する場合のみ。
    pub(crate) fn absorb_delete(&mut self, at: Option<Location>, extra: usize) -> bool {
        let (Some(mine), Some(theirs)) = (self.position, at) else {
            return false;
        };
        let UndoAction::Delete { count } = &mut self.action else {
            return false;
        };
        if mine.line != theirs.line || mine.offset.checked_add(*count) != Some(theirs.offset) {
            return false;
        }
        match count.checked_add(extra) {
            Some(total) => {
                *count = total;
                true
            }
            None => false,
        }
    }
}

/// 記録側APIに渡す編集内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit<'a> {
    Move,
    InsertChar { count: usize, ch: u8 },
    InsertString(&'a [u8]),
    Delete { count: usize },
}

impl<'a> Edit<'a> {
    /// 数値タグと引数から編集内容を組み立てる
    ///
    /// `count` は InsertChar / Delete の件数、`data` は InsertChar の文字
    /// （先頭1バイト）または InsertString の内容として解釈する。
    ///
    /// # Errors
    ///
    /// 未知のタグ、または InsertChar に文字が与えられない場合。
    pub fn from_raw(tag: u8, count: usize, data: &'a [u8]) -> Result<Self> {
        match UndoKind::try_from(tag)? {
            UndoKind::Move => Ok(Edit::Move),
            UndoKind::InsertChar => match data.first() {
                Some(&ch) => Ok(Edit::InsertChar { count, ch }),
                None => Err(UndoError::Edit("InsertChar without a character".to_string())),
            },
            UndoKind::InsertString => Ok(Edit::InsertString(data)),
            UndoKind::Delete => Ok(Edit::Delete { count }),
        }
    }

    pub fn kind(&self) -> UndoKind {
        match self {
            Edit::Move => UndoKind::Move,
            Edit::InsertChar { .. } => UndoKind::InsertChar,
            Edit::InsertString(_) => UndoKind::InsertString,
            Edit::Delete { .. } => UndoKind::Delete,
        }
    }

    /// 何も変化させない編集か（件数0や空文字列）
    pub fn is_empty(&self) -> bool {
        match self {
            Edit::Move => false,
            Edit::InsertChar { count, .. } | Edit::Delete { count } => *count == 0,
            Edit::InsertString(bytes) => bytes.is_empty(),
        }
    }
}
