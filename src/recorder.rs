//! undo記録器
//!
//! コマンドは変更前に [`Recorder::start`] を呼び、原子的な変更ごとに
//! [`Recorder::record`] を呼ぶ。最初の記録で新しいグループが履歴に積まれる。
//!
//! 記録器はクローン可能なハンドルで、変更プリミティブ側から同じ状態を共有できる。
//! 再生中は抑止フラグが立つため、再生が自分自身を記録することはない。

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::UndoConfig;
use crate::context::{BufferPos, BufferView};
use crate::error::{Result, UndoError};
use crate::group::UndoGroup;
use crate::history::UndoHistory;
use crate::record::{Edit, Location, UndoAction, UndoRecord};

/// start で保存したコマンド開始時の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingStart {
    location: Location,
    modified: bool,
}

#[derive(Debug)]
struct RecorderState {
    config: UndoConfig,
    pending: Option<PendingStart>,
    suppressed: bool,
}

/// undo記録器のハンドル
#[derive(Debug, Clone)]
pub struct Recorder {
    inner: Rc<RefCell<RecorderState>>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new(UndoConfig::default())
    }
}

impl Recorder {
    pub fn new(config: UndoConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RecorderState {
                config,
                pending: None,
                suppressed: false,
            })),
        }
    }

    pub fn config(&self) -> UndoConfig {
        self.inner.borrow().config
    }

    /// start 済みでまだ最初の記録が行われていないか
    pub fn has_pending_start(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    pub fn is_suppressed(&self) -> bool {
        self.inner.borrow().suppressed
    }

    /// 記録を止める
    ///
    /// カウンタではないため入れ子には対応しない。最初の [`Recorder::enable`] で解除される。
    pub fn disable(&self) {
        self.inner.borrow_mut().suppressed = true;
    }

    /// 記録を再開
    pub fn enable(&self) {
        self.inner.borrow_mut().suppressed = false;
    }

    /// コマンドの開始
    ///
    /// 現在のカーソル位置（行番号は先頭からの線形走査で求める）と変更フラグを保存する。
    /// 履歴がまだなければここで作成する。次の start までに1つの編集コマンドと対にすること。
    pub fn start<C: BufferView>(&self, ctx: &mut C) {
        let location = ctx.locate(ctx.dot());
        let modified = ctx.is_modified();
        let capacity = self.config().max_groups;
        ctx.undo_history_slot()
            .get_or_insert_with(|| UndoHistory::new(capacity))
            .close();

        let mut state = self.inner.borrow_mut();
        state.pending = Some(PendingStart { location, modified });
        state.suppressed = false;
    }

    /// コマンドの終了（現状は何もしない）
    pub fn end(&self) {}

    /// 原子的な変更を1件記録する
    ///
    /// `at` を渡すとその位置を、そうでなければ start 直後の最初の記録にだけ
    /// start 時の位置を付ける。
    ///
    /// # Errors
    ///
    /// 文字列ペイロードの確保に失敗した場合は [`UndoError::OutOfMemory`]。
    /// このとき変更そのものは取り消されず、この手順だけがundo不能になる。
    pub fn record<C: BufferView>(
        &self,
        ctx: &mut C,
        edit: Edit<'_>,
        at: Option<BufferPos<C::LineId>>,
    ) -> Result<()> {
        let (pending, capacity, coalesce) = {
            let state = self.inner.borrow();
            if state.suppressed {
                log::debug!("undo recording suppressed, dropped {:?}", edit.kind());
                return Ok(());
            }
            (
                state.pending,
                state.config.max_groups,
                state.config.coalesce_across_commands,
            )
        };

        if edit.is_empty() {
            log::debug!("ignored empty {:?} edit", edit.kind());
            return Ok(());
        }

        let action = match edit {
            Edit::Move => UndoAction::Move,
            Edit::InsertChar { count, ch } => UndoAction::InsertChar { count, ch },
            // 1文字の文字列は文字として保存する
            Edit::InsertString(&[ch]) => UndoAction::InsertChar { count: 1, ch },
            Edit::InsertString(bytes) => match own_bytes(bytes) {
                Ok(bytes) => UndoAction::InsertString { bytes },
                Err(err) => {
                    log::error!("{}", err);
                    return Err(err);
                }
            },
            Edit::Delete { count } => UndoAction::Delete { count },
        };

        let position = at
            .map(|pos| ctx.locate(pos))
            .or(pending.map(|start| start.location));
        let modified_now = ctx.is_modified();
        let history = ctx
            .undo_history_slot()
            .get_or_insert_with(|| UndoHistory::new(capacity));

        store(history, pending, coalesce, modified_now, position, action);
        self.inner.borrow_mut().pending = None;
        Ok(())
    }

    /// 数値タグで種別を指定して記録する
    ///
    /// # Errors
    ///
    /// 未知のタグなら [`UndoError::UnknownKind`] を返し、何も記録しない。
    pub fn record_raw<C: BufferView>(
        &self,
        ctx: &mut C,
        tag: u8,
        at: Option<BufferPos<C::LineId>>,
        count: usize,
        data: &[u8],
    ) -> Result<()> {
        match Edit::from_raw(tag, count, data) {
            Ok(edit) => self.record(ctx, edit, at),
            Err(err) => {
                log::error!("{}", err);
                Err(err)
            }
        }
    }
}

fn store(
    history: &mut UndoHistory,
    pending: Option<PendingStart>,
    coalesce_across_commands: bool,
    modified_now: bool,
    position: Option<Location>,
    action: UndoAction,
) {
    if let UndoAction::Delete { count } = action {
        // 直前のレコードとだけ結合を試みる。閉じたグループには結合しない
        let candidate = if history.active_group_mut().is_some() {
            history.active_group_mut().and_then(UndoGroup::last_mut)
        } else if pending.is_some() && coalesce_across_commands {
            history.last_record_mut()
        } else {
            None
        };
        if let Some(last) = candidate {
            if last.absorb_delete(position, count) {
                log::debug!("merged delete of {} into previous record", count);
                if pending.is_some() {
                    history.reopen_last();
                }
                return;
            }
        }
    }

    if let Some(start) = pending {
        history.open_group(UndoGroup::new(start.modified));
        log::debug!("opened undo group #{}", history.len());
    }
    let record = UndoRecord::new(position, action);
    match history.active_group_mut() {
        Some(group) => group.push(record),
        None => {
            log::warn!("undo record outside of a start/end bracket, opening a new group");
            let mut group = UndoGroup::new(modified_now);
            group.push(record);
            history.open_group(group);
        }
    }
}

fn own_bytes(bytes: &[u8]) -> Result<Box<[u8]>> {
    let mut owned = Vec::new();
    owned
        .try_reserve_exact(bytes.len())
        .map_err(|_| UndoError::OutOfMemory {
            requested: bytes.len(),
        })?;
    owned.extend_from_slice(bytes);
    Ok(owned.into_boxed_slice())
}
