//! 単体テスト用のバッファ実装

use crate::context::{BufferPos, BufferView, EditPrimitives};
use crate::error::{Result, UndoError};
use crate::history::UndoHistory;
use crate::record::{Edit, Location};
use crate::recorder::Recorder;

/// 観測したプリミティブ呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Goto(Location),
    InsertChars(usize, u8),
    InsertNewlines(usize),
    InsertBytes(Vec<u8>),
    DeleteForward(usize),
    SetModified(bool),
    ModeLine,
}

#[derive(Debug)]
pub struct FakeBuffer {
    lines: Vec<(u32, Vec<u8>)>,
    next_id: u32,
    dot: (usize, usize),
    pub modified: bool,
    slot: Option<UndoHistory>,
    pub calls: Vec<Call>,
    /// 設定されていればプリミティブが自身を記録しようとする
    pub echo: Option<Recorder>,
}

impl FakeBuffer {
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self {
            lines: Vec::new(),
            next_id: 0,
            dot: (0, 0),
            modified: false,
            slot: None,
            calls: Vec::new(),
            echo: None,
        };
        for line in text.split('\n') {
            let id = buffer.fresh_id();
            buffer.lines.push((id, line.as_bytes().to_vec()));
        }
        buffer
    }

    fn fresh_id(&mut self) -> u32 {
        // 行番号と一致しないIDを使う
        self.next_id += 1;
        self.next_id * 10 + 3
    }

    pub fn text(&self) -> String {
        let lines: Vec<String> = self
            .lines
            .iter()
            .map(|(_, bytes)| String::from_utf8_lossy(bytes).into_owned())
            .collect();
        lines.join("\n")
    }

    pub fn line_id(&self, index: usize) -> u32 {
        self.lines[index].0
    }

    pub fn set_dot(&mut self, line: usize, offset: usize) {
        self.dot = (line, offset);
    }

    pub fn history(&self) -> Option<&UndoHistory> {
        self.slot.as_ref()
    }

    fn echo(&mut self, edit: Edit<'_>) {
        if let Some(recorder) = self.echo.clone() {
            let _ = recorder.record(self, edit, None);
        }
    }

    fn insert_byte(&mut self, byte: u8) {
        let (line, offset) = self.dot;
        if byte == b'\n' {
            let tail = self.lines[line].1.split_off(offset);
            let id = self.fresh_id();
            self.lines.insert(line + 1, (id, tail));
            self.dot = (line + 1, 0);
        } else {
            self.lines[line].1.insert(offset, byte);
            self.dot = (line, offset + 1);
        }
    }
}

impl BufferView for FakeBuffer {
    type LineId = u32;

    fn lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.iter().map(|(id, _)| *id)
    }

    fn dot(&self) -> BufferPos<u32> {
        BufferPos::new(self.lines[self.dot.0].0, self.dot.1)
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn undo_history_slot(&mut self) -> &mut Option<UndoHistory> {
        &mut self.slot
    }
}

impl EditPrimitives for FakeBuffer {
    fn goto(&mut self, at: Location) -> Result<()> {
        self.calls.push(Call::Goto(at));
        match self.lines.get(at.line) {
            Some((_, bytes)) if at.offset <= bytes.len() => {
                self.dot = (at.line, at.offset);
                Ok(())
            }
            _ => Err(UndoError::Navigation {
                line: at.line,
                offset: at.offset,
                reason: "out of range".to_string(),
            }),
        }
    }

    fn insert_chars(&mut self, count: usize, ch: u8) -> Result<()> {
        self.calls.push(Call::InsertChars(count, ch));
        for _ in 0..count {
            self.insert_byte(ch);
        }
        self.echo(Edit::Delete { count });
        Ok(())
    }

    fn insert_newlines(&mut self, count: usize) -> Result<()> {
        self.calls.push(Call::InsertNewlines(count));
        for _ in 0..count {
            self.insert_byte(b'\n');
        }
        Ok(())
    }

    fn insert_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.calls.push(Call::InsertBytes(bytes.to_vec()));
        for &byte in bytes {
            self.insert_byte(byte);
        }
        Ok(())
    }

    fn delete_forward(&mut self, count: usize) -> Result<()> {
        self.calls.push(Call::DeleteForward(count));
        for _ in 0..count {
            let (line, offset) = self.dot;
            if offset < self.lines[line].1.len() {
                self.lines[line].1.remove(offset);
            } else if line + 1 < self.lines.len() {
                let (_, next) = self.lines.remove(line + 1);
                self.lines[line].1.extend(next);
            } else {
                return Err(UndoError::Edit("end of buffer".to_string()));
            }
        }
        self.echo(Edit::Move);
        Ok(())
    }

    fn set_modified(&mut self, modified: bool) {
        self.calls.push(Call::SetModified(modified));
        self.modified = modified;
    }

    fn request_mode_line_refresh(&mut self) {
        self.calls.push(Call::ModeLine);
    }
}
