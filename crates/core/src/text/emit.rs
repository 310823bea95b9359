//! Text emission with mark back-references.

use crate::geometry::{RECT_EQ_TOL, Rect};
use crate::layout::{Line, Paragraph};
use crate::mark::Mark;
use crate::params::LayoutParams;
use crate::table::Table;

use super::marks::{TextMark, TextMarkArray};
use super::{PageText, TableCell, TextTable};

const PARAGRAPH_SEP: &str = "\n\n";
const LINE_SEP: &str = "\n";
const WORD_SEP: &str = " ";
const CELL_SEP: &str = " ";
const EMPTY_CELL: &str = "\t";
const ROW_SEP: &str = "\n";

struct Emitter<'p> {
    text: String,
    marks: TextMarkArray,
    tables: Vec<TextTable>,
    params: &'p LayoutParams,
}

impl<'p> Emitter<'p> {
    fn new(params: &'p LayoutParams) -> Self {
        Self {
            text: String::new(),
            marks: TextMarkArray::new(),
            tables: Vec::new(),
            params,
        }
    }

    fn mark(&mut self, mark: &Mark, text: &str) {
        if text.is_empty() {
            return;
        }
        self.marks.push(TextMark::from_mark(mark, text, self.text.len()));
        self.text.push_str(text);
    }

    fn meta(&mut self, text: &str, bbox: Rect) {
        self.marks.push(TextMark::meta(text, bbox, self.text.len()));
        self.text.push_str(text);
    }

    fn line(&mut self, line: &Line, drop_hyphen: bool) {
        let words = line.words();
        for (wi, word) in words.iter().enumerate() {
            let last_word = wi + 1 == words.len();
            let marks = word.marks();
            for (mi, mark) in marks.iter().enumerate() {
                if drop_hyphen && last_word && mi + 1 == marks.len() {
                    let mut text = mark.text.clone();
                    text.pop();
                    self.mark(mark, &text);
                } else {
                    self.mark(mark, &mark.text);
                }
            }
            if word.space_after() && !last_word {
                self.meta(WORD_SEP, word.bbox());
            }
        }
    }

    /// Lines joined by `sep`, or a space when the next line sits at the
    /// same depth. A hyphenated line other than the last loses its hyphen
    /// and runs straight into the next.
    fn lines(&mut self, lines: &[Line], sep: &str) {
        for (i, line) in lines.iter().enumerate() {
            let next = lines.get(i + 1);
            let drop_hyphen = self.params.do_hyphens && line.hyphenated() && next.is_some();
            self.line(line, drop_hyphen);
            let Some(next) = next else { continue };
            if drop_hyphen {
                continue;
            }
            if (next.depth() - line.depth()).abs() < RECT_EQ_TOL {
                self.meta(WORD_SEP, line.bbox());
            } else {
                self.meta(sep, line.bbox());
            }
        }
    }

    fn table(&mut self, table: &Table) {
        let mut rows = Vec::with_capacity(table.h());
        for (y, row) in table.rows().enumerate() {
            if y > 0 {
                self.meta(ROW_SEP, table.bbox());
            }
            let mut cells = Vec::with_capacity(table.w());
            for (x, cell) in row.iter().enumerate() {
                if x > 0 {
                    self.meta(CELL_SEP, table.bbox());
                }
                match cell {
                    Some(para) => {
                        let start = self.text.len();
                        let first = self.marks.len();
                        self.lines(para.lines(), CELL_SEP);
                        cells.push(TableCell {
                            text: self.text[start..].to_string(),
                            bbox: Some(para.bbox()),
                            marks: self.marks.slice_from(first).shifted(-(start as isize)),
                        });
                    }
                    None => {
                        self.meta(EMPTY_CELL, table.bbox());
                        cells.push(TableCell::default());
                    }
                }
            }
            rows.push(cells);
        }
        self.tables.push(TextTable {
            bbox: table.bbox(),
            w: table.w(),
            h: table.h(),
            cells: rows,
        });
    }

    fn paragraph(&mut self, para: &Paragraph) {
        match para.table() {
            Some(table) => self.table(table),
            None => self.lines(para.lines(), LINE_SEP),
        }
    }
}

/// Emits ordered paragraphs as page text, separated by blank lines.
pub fn emit_page(page: usize, paras: &[Paragraph], params: &LayoutParams) -> PageText {
    let mut emitter = Emitter::new(params);
    for (i, para) in paras.iter().enumerate() {
        if i > 0 {
            emitter.meta(PARAGRAPH_SEP, paras[i - 1].bbox());
        }
        emitter.paragraph(para);
    }
    PageText {
        page,
        text: emitter.text,
        marks: emitter.marks,
        tables: emitter.tables,
    }
}

impl Paragraph {
    /// Text of this paragraph alone, as the page emitter would write it.
    pub fn text(&self, params: &LayoutParams) -> String {
        let mut emitter = Emitter::new(params);
        emitter.paragraph(self);
        emitter.text
    }
}
