//! undoグループ
//!
//! 1つのコマンドに対応するレコード列と、コマンド開始前の変更フラグを保持する。

use crate::record::UndoRecord;

/// 1回のundoで戻される単位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoGroup {
    records: Vec<UndoRecord>,
    saved_modified: bool,
}

impl UndoGroup {
    /// 空のグループを作成
    pub fn new(saved_modified: bool) -> Self {
        Self {
            records: Vec::new(),
            saved_modified,
        }
    }

    /// コマンド開始前のバッファ変更フラグ
    pub fn saved_modified(&self) -> bool {
        self.saved_modified
    }

    pub fn records(&self) -> &[UndoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn push(&mut self, record: UndoRecord) {
        self.records.push(record);
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut UndoRecord> {
        self.records.last_mut()
    }

    /// 再生順に部分列を返す
    ///
    /// 位置を持つレコードが部分列の先頭になる（先頭レコードは位置がなくても先頭）。
    /// 部分列は後ろから順に、各部分列の中身は記録順のまま返される。
    pub fn subsequences(&self) -> Subsequences<'_> {
        Subsequences {
            rest: &self.records,
        }
    }
}

/// [`UndoGroup::subsequences`] のイテレータ
#[derive(Debug, Clone)]
pub struct Subsequences<'a> {
    rest: &'a [UndoRecord],
}

impl<'a> Iterator for Subsequences<'a> {
    type Item = &'a [UndoRecord];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let start = self
            .rest
            .iter()
            .rposition(|record| record.position().is_some())
            .unwrap_or(0);
        let (head, tail) = self.rest.split_at(start);
        self.rest = head;
        Some(tail)
    }
}
