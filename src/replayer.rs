//! undo再生
//!
//! # 再生順序
//!
//! グループ内で位置を持つレコードは新しい部分列の先頭になり、続く位置なしの
//! レコードはその部分列に属する。部分列は後ろから順に再生し、部分列の中は
//! 記録順に再生する。カーソルを動かす部分列の後に続くレコードはその位置に
//! 依存しているため、後の部分列を先に戻してから前の位置を復元する。
//!
//! 再生は失敗があっても最後まで行い、最後に変更フラグをグループ作成時の値に戻す。

use crate::config::UndoConfig;
use crate::context::{BufferPos, BufferView, EditPrimitives};
use crate::error::{Result, UndoError};
use crate::group::UndoGroup;
use crate::record::{Edit, UndoAction, UndoRecord};
use crate::recorder::Recorder;

/// 再生結果の集計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayStats {
    pub total: usize,
    pub failed: usize,
}

impl ReplayStats {
    fn absorb(&mut self, other: ReplayStats) {
        self.total += other.total;
        self.failed += other.failed;
    }
}

/// undo管理マネージャ（記録器と再生処理をまとめる）
#[derive(Debug, Clone, Default)]
pub struct UndoManager {
    recorder: Recorder,
}

impl UndoManager {
    pub fn new(config: UndoConfig) -> Self {
        Self {
            recorder: Recorder::new(config),
        }
    }

    /// 変更プリミティブ側へ渡す記録器ハンドル
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn start<C: BufferView>(&self, ctx: &mut C) {
        self.recorder.start(ctx);
    }

    pub fn end(&self) {
        self.recorder.end();
    }

    pub fn record<C: BufferView>(
        &self,
        ctx: &mut C,
        edit: Edit<'_>,
        at: Option<BufferPos<C::LineId>>,
    ) -> Result<()> {
        self.recorder.record(ctx, edit, at)
    }

    pub fn disable(&self) {
        self.recorder.disable();
    }

    pub fn enable(&self) {
        self.recorder.enable();
    }

    /// 直近のコマンドを取り消す
    ///
    /// `count` は繰り返し回数で、1以下なら1回。履歴が尽きたらそこで止まる。
    ///
    /// # Errors
    ///
    /// 1グループも無ければ [`UndoError::NothingToUndo`]。
    /// 一部の手順が失敗した場合は [`UndoError::ReplayIncomplete`]（再生自体は最後まで行う）。
    pub fn undo<C: EditPrimitives>(&self, ctx: &mut C, count: usize) -> Result<()> {
        let mut stats = ReplayStats::default();
        let mut replayed = 0;

        self.recorder.disable();
        for _ in 0..count.max(1) {
            let Some(group) = ctx
                .undo_history_slot()
                .as_mut()
                .and_then(|history| history.pop_last_group())
            else {
                break;
            };
            stats.absorb(replay_group(ctx, &group));
            replayed += 1;
        }
        self.recorder.enable();

        if replayed == 0 {
            log::warn!("{}", UndoError::NothingToUndo);
            return Err(UndoError::NothingToUndo);
        }
        log::debug!(
            "undid {} group(s), {} step(s), {} failed",
            replayed,
            stats.total,
            stats.failed
        );
        if stats.failed > 0 {
            return Err(UndoError::ReplayIncomplete {
                failed: stats.failed,
                total: stats.total,
            });
        }
        Ok(())
    }

    /// バッファ破棄時に履歴を解放し、解放したグループ数を返す
    pub fn destroy_history<C: BufferView>(&self, ctx: &mut C) -> usize {
        match ctx.undo_history_slot().take() {
            Some(mut history) => {
                let groups = history.len();
                history.destroy_all();
                log::debug!("destroyed undo history with {} group(s)", groups);
                groups
            }
            None => 0,
        }
    }
}

/// グループ1つを再生し、変更フラグを復元する
///
/// 呼び出し側で記録を抑止しておくこと。
pub fn replay_group<C: EditPrimitives>(ctx: &mut C, group: &UndoGroup) -> ReplayStats {
    let mut stats = ReplayStats::default();
    for subsequence in group.subsequences() {
        for record in subsequence {
            stats.total += 1;
            if let Err(err) = undo_step(ctx, record) {
                log::warn!("undo step {:?} failed: {}", record.kind(), err);
                stats.failed += 1;
            }
        }
    }

    // トグルではなく絶対値で戻す
    ctx.set_modified(group.saved_modified());
    ctx.request_mode_line_refresh();
    stats
}

/// 1レコード分の逆操作
///
/// 位置を持つならまずそこへ移動する。移動に失敗したらこのレコードの操作は行わない。
pub fn undo_step<C: EditPrimitives>(ctx: &mut C, record: &UndoRecord) -> Result<()> {
    if let Some(at) = record.position() {
        ctx.goto(at)?;
    }
    match record.action() {
        UndoAction::Move => Ok(()),
        UndoAction::InsertChar { count, ch: b'\n' } => ctx.insert_newlines(*count),
        UndoAction::InsertChar { count, ch } => ctx.insert_chars(*count, *ch),
        UndoAction::InsertString { bytes } => ctx.insert_bytes(bytes),
        UndoAction::Delete { count } => ctx.delete_forward(*count),
    }
}
