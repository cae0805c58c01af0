//! エディタ側との接続インターフェース
//!
//! 行の保持、カーソル移動、テキスト変更のプリミティブはエディタが実装する。
//! undoエンジンはこれらのトレイトを通してのみバッファに触れる。

use crate::error::Result;
use crate::history::UndoHistory;
use crate::record::Location;

/// 行の識別子とオフセットの組（ライブなカーソルやマーク）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPos<L> {
    pub line: L,
    pub offset: usize,
}

impl<L> BufferPos<L> {
    pub fn new(line: L, offset: usize) -> Self {
        Self { line, offset }
    }
}

/// 読み取り側の編集コンテキスト（現在のバッファとカーソル）
pub trait BufferView {
    /// 行の同一性を表す値（行へのハンドルやID）
    type LineId: Copy + PartialEq;

    /// 先頭から順に行を走査
    fn lines(&self) -> impl Iterator<Item = Self::LineId> + '_;

    /// 現在のカーソル（dot）
    fn dot(&self) -> BufferPos<Self::LineId>;

    /// バッファ変更フラグ
    fn is_modified(&self) -> bool;

    /// このバッファのundo履歴の格納先
    fn undo_history_slot(&mut self) -> &mut Option<UndoHistory>;

    /// 行の識別子から0ベースの行番号を求める
    ///
    /// 先頭行から線形に数える。見つからなければ行数を返す。
    fn line_number(&self, line: Self::LineId) -> usize {
        let mut number = 0;
        for id in self.lines() {
            if id == line {
                break;
            }
            number += 1;
        }
        number
    }

    /// ライブな位置を記録用の位置に変換
    fn locate(&self, pos: BufferPos<Self::LineId>) -> Location {
        Location::new(self.line_number(pos.line), pos.offset)
    }
}

/// 再生で使う変更プリミティブ
///
/// 各操作はカーソル位置に対して働き、カーソルは挿入した内容の後ろへ進む。
pub trait EditPrimitives: BufferView {
    /// 指定位置へカーソルを移動（行が範囲外なら失敗）
    fn goto(&mut self, at: Location) -> Result<()>;

    /// `ch` を `count` 個挿入
    fn insert_chars(&mut self, count: usize, ch: u8) -> Result<()>;

    /// 改行を `count` 個挿入
    fn insert_newlines(&mut self, count: usize) -> Result<()>;

    /// バイト列をそのまま挿入（改行を含んでよい）
    fn insert_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// カーソルから前方へ `count` 文字削除
    fn delete_forward(&mut self, count: usize) -> Result<()>;

    fn set_modified(&mut self, modified: bool);

    /// モードラインの再描画を要求
    fn request_mode_line_refresh(&mut self) {}
}
