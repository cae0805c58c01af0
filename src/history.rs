//! バッファごとのundo履歴
//!
//! 容量を超えると最も古いグループから黙って捨てる有界スタック。

use crate::group::UndoGroup;
use crate::record::UndoRecord;
use std::collections::VecDeque;

/// グループの有界スタック（末尾が最新）
#[derive(Debug, Clone)]
pub struct UndoHistory {
    groups: VecDeque<UndoGroup>,
    capacity: usize,
    /// 末尾グループが現在のコマンドの記録先かどうか
    open: bool,
}

impl UndoHistory {
    /// 指定容量の空の履歴を作成（容量0は1として扱う）
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            groups: VecDeque::with_capacity(capacity.min(16)),
            capacity,
            open: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// 古い順にグループを走査
    pub fn iter(&self) -> impl Iterator<Item = &UndoGroup> + '_ {
        self.groups.iter()
    }

    pub fn last_group(&self) -> Option<&UndoGroup> {
        self.groups.back()
    }

    /// グループを末尾に追加し、容量を超えたら先頭を破棄
    pub fn push_group(&mut self, group: UndoGroup) {
        self.groups.push_back(group);
        if self.groups.len() > self.capacity {
            if let Some(evicted) = self.groups.pop_front() {
                log::debug!(
                    "undo history full ({}), evicted oldest group of {} records",
                    self.capacity,
                    evicted.len()
                );
            }
        }
    }

    /// 末尾グループを取り出す
    pub fn pop_last_group(&mut self) -> Option<UndoGroup> {
        self.open = false;
        self.groups.pop_back()
    }

    /// 全グループを破棄
    pub fn destroy_all(&mut self) {
        self.groups.clear();
        self.open = false;
    }

    /// 新しいグループを記録先として追加
    pub(crate) fn open_group(&mut self, group: UndoGroup) {
        self.push_group(group);
        self.open = true;
    }

    /// 末尾グループを記録先として再開（削除の結合時）
    pub(crate) fn reopen_last(&mut self) {
        self.open = !self.groups.is_empty();
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
    }

    pub(crate) fn active_group_mut(&mut self) -> Option<&mut UndoGroup> {
        if self.open {
            self.groups.back_mut()
        } else {
            None
        }
    }

    /// 最後に記録されたレコード（末尾グループの末尾）
    pub(crate) fn last_record_mut(&mut self) -> Option<&mut UndoRecord> {
        self.groups.back_mut().and_then(UndoGroup::last_mut)
    }
}
